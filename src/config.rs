// ⚙️ Configuration - Settings as Data
// Every field has a default matching the 2024 Statistics Finland extract

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// NUMERIC POLICY
// ============================================================================

/// What to do when a retained row carries an unreadable count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericPolicy {
    /// Count it as zero (the behaviour of the published tool)
    #[default]
    DefaultZero,

    /// Fail the ingestion run
    Strict,
}

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File path or http(s) URL of the CSV export
    pub source: String,

    /// Only rows for this year are kept
    pub target_year: i32,

    /// Substring (case-insensitive) marking the all-ages summary row
    pub summary_marker: String,

    /// Label of the year column; the header line starts with it in quotes
    pub header_label: String,

    /// Area name of the whole-country row
    pub national_sentinel: String,

    /// Collation locale for sorting area names
    pub locale: String,

    pub numeric_policy: NumericPolicy,

    /// Write logs here instead of stderr
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source: "data.csv".to_string(),
            target_year: 2024,
            summary_marker: "yhteens".to_string(),
            header_label: "Vuosi".to_string(),
            national_sentinel: "KOKO MAA".to_string(),
            locale: "fi".to_string(),
            numeric_policy: NumericPolicy::DefaultZero,
            log_file: None,
        }
    }
}

impl Config {
    /// Load config from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Config file if given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    /// The literal the header line must start with, e.g. `"Vuosi"`
    pub fn header_marker(&self) -> String {
        format!("\"{}\"", self.header_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.target_year, 2024);
        assert_eq!(config.summary_marker, "yhteens");
        assert_eq!(config.national_sentinel, "KOKO MAA");
        assert_eq!(config.numeric_policy, NumericPolicy::DefaultZero);
        assert_eq!(config.header_marker(), "\"Vuosi\"");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"target_year": 2023, "numeric_policy": "strict"}"#).unwrap();

        assert_eq!(config.target_year, 2023);
        assert_eq!(config.numeric_policy, NumericPolicy::Strict);
        assert_eq!(config.locale, "fi");
        assert_eq!(config.source, "data.csv");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"source": "vaka.csv", "log_file": "/tmp/kuntahaku.log"}}"#).unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.source, "vaka.csv");
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/kuntahaku.log")));
    }

    #[test]
    fn test_from_file_missing() {
        assert!(Config::from_file("/nonexistent/kuntahaku.json").is_err());
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let result: std::result::Result<Config, _> =
            serde_json::from_str(r#"{"numeric_policy": "loud"}"#);
        assert!(result.is_err());
    }
}
