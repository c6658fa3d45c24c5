// 🔎 Lookup Index - read-only view over the ingested collection
// Exact lookup, substring autocomplete, national aggregate

use crate::parser::AreaRecord;

/// Trimmed and lower-cased, the key every query is compared on
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

pub struct AreaIndex {
    /// Already in collation order
    records: Vec<AreaRecord>,
    /// `normalize(area_name)` per record, same positions
    keys: Vec<String>,
    national_sentinel: String,
}

impl AreaIndex {
    pub fn new(records: Vec<AreaRecord>, national_sentinel: &str) -> Self {
        let keys = records.iter().map(|r| normalize(&r.area_name)).collect();
        AreaIndex {
            records,
            keys,
            national_sentinel: national_sentinel.to_string(),
        }
    }

    /// Index with nothing in it; every query answers not-found
    pub fn empty(national_sentinel: &str) -> Self {
        Self::new(Vec::new(), national_sentinel)
    }

    /// Whole-name match, ignoring case and surrounding whitespace
    pub fn find_exact(&self, query: &str) -> Option<&AreaRecord> {
        let query = normalize(query);
        self.keys
            .iter()
            .position(|key| *key == query)
            .map(|i| &self.records[i])
    }

    /// Every record whose name contains `partial`, in collection order.
    /// An empty (or blank) partial matches everything.
    pub fn suggest(&self, partial: &str) -> Vec<&AreaRecord> {
        let partial = normalize(partial);
        self.records
            .iter()
            .zip(&self.keys)
            .filter(|(_, key)| key.contains(&partial))
            .map(|(record, _)| record)
            .collect()
    }

    /// The whole-country row, matched on the exact sentinel name
    pub fn national_aggregate(&self) -> Option<&AreaRecord> {
        self.records
            .iter()
            .find(|r| r.area_name == self.national_sentinel)
    }

    pub fn records(&self) -> &[AreaRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn national_sentinel(&self) -> &str {
        &self.national_sentinel
    }
}

/// Share of foreign-language children in percent, one decimal, half-up.
///
/// `None` when nobody is enrolled; the display renders that as "0.0%".
pub fn percentage_foreign(record: &AreaRecord) -> Option<f64> {
    let total = record.total() as u128;
    if total == 0 {
        return None;
    }

    let foreign = record.foreign() as u128;
    // Tenths of a percent, rounded half-up in integers
    let tenths = (foreign * 2000 + total) / (2 * total);
    Some(tenths as f64 / 10.0)
}
