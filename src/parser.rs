// 🏗️ Parser - Statistics Finland semicolon export
// Decode → split lines → find header → split fields → typed rows

use csv::{ReaderBuilder, Terminator};
use encoding_rs::WINDOWS_1252;
use serde::Serialize;
use std::borrow::Cow;
use tracing::debug;

use crate::error::IngestError;

/// Fields a data line must have: year, area, age, total, foreign
pub const MIN_FIELDS: usize = 5;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Count - Outcome of reading a numeric column
///
/// Unreadable content is not an error, it counts as zero. Keeping the
/// variant makes the coercion visible to callers and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "u64")]
pub enum Count {
    Parsed(u64),
    Defaulted { raw: String },
}

impl Count {
    /// Read a count the way `parseInt(s, 10) || 0` does
    pub fn parse(raw: &str) -> Self {
        match leading_integer(raw) {
            Some(n) if n >= 0 => Count::Parsed(n as u64),
            _ => Count::Defaulted {
                raw: raw.to_string(),
            },
        }
    }

    pub fn value(&self) -> u64 {
        match self {
            Count::Parsed(n) => *n,
            Count::Defaulted { .. } => 0,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, Count::Defaulted { .. })
    }
}

impl From<Count> for u64 {
    fn from(count: Count) -> u64 {
        count.value()
    }
}

/// RawRecord - One parsed data line, before filtering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawRecord {
    /// `None` when field 0 has no leading integer; never matches a target year
    pub year: Option<i32>,
    pub area_name: String,
    pub age_category: String,
    pub total_enrolled: Count,
    pub foreign_language_enrolled: Count,

    /// 1-based line in the decoded text
    #[serde(skip)]
    pub line: usize,
}

/// AreaRecord - A retained summary row for the target year
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaRecord {
    pub year: i32,
    pub area_name: String,
    pub age_category: String,
    pub total_enrolled: Count,
    pub foreign_language_enrolled: Count,

    #[serde(skip)]
    pub line: usize,
}

impl RawRecord {
    /// Keep the row if it is the summary row of `target_year`
    pub fn retain(self, target_year: i32, summary_marker: &str) -> Option<AreaRecord> {
        let year = self.year.filter(|y| *y == target_year)?;

        if !self
            .age_category
            .to_lowercase()
            .contains(&summary_marker.to_lowercase())
        {
            return None;
        }

        Some(AreaRecord {
            year,
            area_name: self.area_name,
            age_category: self.age_category,
            total_enrolled: self.total_enrolled,
            foreign_language_enrolled: self.foreign_language_enrolled,
            line: self.line,
        })
    }
}

impl AreaRecord {
    pub fn total(&self) -> u64 {
        self.total_enrolled.value()
    }

    pub fn foreign(&self) -> u64 {
        self.foreign_language_enrolled.value()
    }
}

// ============================================================================
// DECODING & LINES
// ============================================================================

/// Decode the export's Latin-1 bytes
///
/// WHATWG maps the `iso-8859-1` label to windows-1252, and so do we.
/// Decoding never fails; bytes without a mapping become U+FFFD.
pub fn decode(raw: &[u8]) -> Cow<'_, str> {
    let (text, had_errors) = WINDOWS_1252.decode_without_bom_handling(raw);
    if had_errors {
        debug!("source contained bytes without a windows-1252 mapping");
    }
    text
}

/// Index of the first line whose trimmed content starts with `marker`
pub fn find_header(lines: &[&str], marker: &str) -> Result<usize, IngestError> {
    lines
        .iter()
        .position(|line| line.trim().starts_with(marker))
        .ok_or(IngestError::HeaderNotFound)
}

/// Non-empty trimmed lines after the header, with their 1-based line numbers
pub fn data_lines<'a>(text: &'a str, header_marker: &str) -> Result<Vec<(usize, &'a str)>, IngestError> {
    // `lines()` splits on \n and drops a trailing \r
    let lines: Vec<&str> = text.lines().collect();
    let header = find_header(&lines, header_marker)?;

    Ok(lines
        .iter()
        .enumerate()
        .skip(header + 1)
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect())
}

// ============================================================================
// FIELD PARSING
// ============================================================================

/// Leading base-10 integer, `parseInt` style
///
/// Leading whitespace and one sign are allowed, then the longest run of
/// digits. Anything after the digits is ignored. No digits → `None`.
pub fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }

    let value: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -value } else { value })
}

fn text_field(field: &str) -> String {
    field.replace('"', "").trim().to_string()
}

/// Quotes and all whitespace removed, so "1 234" reads as 1234
fn numeric_field(field: &str) -> String {
    field
        .chars()
        .filter(|c| *c != '"' && !c.is_whitespace())
        .collect()
}

/// What happened to the data lines
#[derive(Debug, Default)]
pub struct ParsedLines {
    pub records: Vec<RawRecord>,
    pub short_rows: usize,
    pub unreadable_rows: usize,
}

/// Split each data line on `;` and type its first five fields
///
/// Short lines are skipped, never fatal.
pub fn parse_data_lines(lines: &[(usize, &str)]) -> ParsedLines {
    let joined = lines
        .iter()
        .map(|(_, line)| *line)
        .collect::<Vec<_>>()
        .join("\n");

    // Quoting off: a plain split, quotes stay in the field and get stripped below
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .quoting(false)
        .has_headers(false)
        .flexible(true)
        .terminator(Terminator::Any(b'\n'))
        .from_reader(joined.as_bytes());

    let mut parsed = ParsedLines::default();

    for (i, result) in reader.records().enumerate() {
        let line = lines.get(i).map(|(n, _)| *n).unwrap_or(0);

        let record = match result {
            Ok(record) => record,
            Err(err) => {
                debug!(line, error = %err, "skipping unreadable row");
                parsed.unreadable_rows += 1;
                continue;
            }
        };

        if record.len() < MIN_FIELDS {
            debug!(line, fields = record.len(), "skipping short row");
            parsed.short_rows += 1;
            continue;
        }

        let year = leading_integer(&text_field(&record[0])).and_then(|y| i32::try_from(y).ok());

        parsed.records.push(RawRecord {
            year,
            area_name: text_field(&record[1]),
            age_category: text_field(&record[2]),
            total_enrolled: Count::parse(&numeric_field(&record[3])),
            foreign_language_enrolled: Count::parse(&numeric_field(&record[4])),
            line,
        });
    }

    parsed
}

// ============================================================================
// TESTS
// ============================================================================
