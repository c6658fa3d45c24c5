// 📥 Ingestion Pipeline
// bytes → decoded text → data lines → typed rows → target-year summary rows, sorted

use serde::Serialize;
use tracing::{info, warn};

use crate::collation::Collation;
use crate::config::{Config, NumericPolicy};
use crate::error::IngestError;
use crate::parser::{data_lines, decode, parse_data_lines, AreaRecord, Count};

// ============================================================================
// REPORT
// ============================================================================

/// Line accounting for one ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Non-empty lines after the header
    pub data_lines: usize,
    /// Fewer than five fields
    pub short_rows: usize,
    pub unreadable_rows: usize,
    /// Rows with at least five fields
    pub parsed: usize,
    /// Wrong year or not a summary row
    pub excluded: usize,
    pub retained: usize,
    /// Counts in retained rows read as zero
    pub defaulted_counts: usize,
}

/// Output of a run: sorted records plus what happened on the way
#[derive(Debug, Clone)]
pub struct Ingested {
    pub records: Vec<AreaRecord>,
    pub report: IngestReport,
}

// ============================================================================
// INGESTOR
// ============================================================================

pub struct Ingestor {
    pub target_year: i32,
    pub summary_marker: String,
    pub header_marker: String,
    pub numeric_policy: NumericPolicy,
}

impl Ingestor {
    pub fn new(target_year: i32, summary_marker: &str) -> Self {
        let defaults = Config::default();
        Ingestor {
            target_year,
            summary_marker: summary_marker.to_string(),
            header_marker: defaults.header_marker(),
            numeric_policy: NumericPolicy::DefaultZero,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Ingestor {
            target_year: config.target_year,
            summary_marker: config.summary_marker.clone(),
            header_marker: config.header_marker(),
            numeric_policy: config.numeric_policy,
        }
    }

    pub fn with_policy(mut self, policy: NumericPolicy) -> Self {
        self.numeric_policy = policy;
        self
    }

    /// Run the whole pipeline. Nothing is returned unless every step succeeds.
    pub fn run(&self, raw: &[u8], collation: &dyn Collation) -> Result<Ingested, IngestError> {
        let text = decode(raw);
        let lines = data_lines(&text, &self.header_marker)?;
        let parsed = parse_data_lines(&lines);

        let mut report = IngestReport {
            data_lines: lines.len(),
            short_rows: parsed.short_rows,
            unreadable_rows: parsed.unreadable_rows,
            parsed: parsed.records.len(),
            ..IngestReport::default()
        };

        let mut records = Vec::new();
        for raw_record in parsed.records {
            match raw_record.retain(self.target_year, &self.summary_marker) {
                Some(record) => records.push(record),
                None => report.excluded += 1,
            }
        }

        for record in &records {
            for (field, count) in [
                ("total_enrolled", &record.total_enrolled),
                ("foreign_language_enrolled", &record.foreign_language_enrolled),
            ] {
                if let Count::Defaulted { raw } = count {
                    if self.numeric_policy == NumericPolicy::Strict {
                        return Err(IngestError::InvalidCount {
                            line: record.line,
                            field,
                            raw: raw.clone(),
                        });
                    }
                    warn!(line = record.line, area = %record.area_name, field, raw = %raw, "count read as zero");
                    report.defaulted_counts += 1;
                }
            }
        }

        records.sort_by(|a, b| collation.compare(&a.area_name, &b.area_name));
        report.retained = records.len();

        info!(
            year = self.target_year,
            data_lines = report.data_lines,
            retained = report.retained,
            excluded = report.excluded,
            short_rows = report.short_rows,
            "ingested source"
        );

        Ok(Ingested { records, report })
    }
}

/// Parse, filter and sort with the default numeric policy
pub fn ingest(
    raw: &[u8],
    target_year: i32,
    summary_marker: &str,
    collation: &dyn Collation,
) -> Result<Vec<AreaRecord>, IngestError> {
    Ingestor::new(target_year, summary_marker)
        .run(raw, collation)
        .map(|ingested| ingested.records)
}

// ============================================================================
// TESTS
// ============================================================================
