// Fetch → ingest → index, once per process

use sha2::{Digest, Sha256};
use tracing::info;

use crate::collation::LocaleCollator;
use crate::config::Config;
use crate::error::LoadError;
use crate::index::AreaIndex;
use crate::ingest::{IngestReport, Ingestor};
use crate::source::ByteSource;

/// A finished load: the index is complete or there is no `Loaded` at all
pub struct Loaded {
    pub index: AreaIndex,
    pub report: IngestReport,
    /// SHA-256 of the fetched bytes, hex
    pub digest: String,
}

/// Hex SHA-256 of the raw payload, logged for provenance
pub fn source_digest(raw: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw);
    format!("{:x}", hasher.finalize())
}

pub fn load_index(source: &dyn ByteSource, config: &Config) -> Result<Loaded, LoadError> {
    let raw = source.fetch()?;
    let digest = source_digest(&raw);
    info!(source = %source.describe(), bytes = raw.len(), sha256 = %digest, "fetched source");

    let collator = LocaleCollator::new(&config.locale)?;
    let ingested = Ingestor::from_config(config).run(&raw, &collator)?;

    let index = AreaIndex::new(ingested.records, &config.national_sentinel);
    if index.national_aggregate().is_none() {
        info!(sentinel = %config.national_sentinel, "no national aggregate row in source");
    }

    Ok(Loaded {
        index,
        report: ingested.report,
        digest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{IngestError, RetrievalError};
    use crate::index::percentage_foreign;
    use crate::source::FileSource;

    fn latin1(text: &str) -> Vec<u8> {
        text.chars().map(|c| c as u32 as u8).collect()
    }

    #[test]
    fn test_end_to_end() {
        let raw = latin1(concat!(
            "\"Varhaiskasvatukseen osallistuneet lapset\"\n",
            "\"Vuosi\";\"Alue\";\"Ikä\";\"Yhteensä\";\"Vieraskieliset\"\n",
            "\"2023\";\"Helsinki\";\"Yhteensä\";\"980\";\"140\"\n",
            "\"2024\";\"Helsinki\";\"Yhteensä\";\"1000\";\"150\"\n",
            "\"2024\";\"KOKO MAA\";\"Yhteensä\";\"250 000\";\"30 000\"\n",
        ));

        let loaded = load_index(&raw, &Config::default()).unwrap();
        let helsinki: Vec<_> = loaded
            .index
            .records()
            .iter()
            .filter(|r| r.area_name == "Helsinki")
            .collect();
        assert_eq!(helsinki.len(), 1);
        assert_eq!(helsinki[0].total(), 1000);
        assert_eq!(helsinki[0].foreign(), 150);

        let found = loaded.index.find_exact("helsinki").unwrap();
        assert_eq!(percentage_foreign(found), Some(15.0));

        let national = loaded.index.national_aggregate().unwrap();
        assert_eq!(national.total(), 250000);
        assert_eq!(percentage_foreign(national), Some(12.0));

        assert_eq!(loaded.report.retained, 2);
        assert_eq!(loaded.digest.len(), 64);
    }

    #[test]
    fn test_header_missing_is_format_error() {
        let raw = latin1("\"2024\";\"Helsinki\";\"Yhteensä\";\"1000\";\"150\"\n");
        let err = load_index(&raw, &Config::default()).err().unwrap();
        assert!(matches!(err, LoadError::Format(IngestError::HeaderNotFound)));
    }

    #[test]
    fn test_retrieval_error_propagates() {
        let source = FileSource::new("/nonexistent/data.csv");
        let err = load_index(&source, &Config::default()).err().unwrap();
        assert!(matches!(err, LoadError::Retrieval(RetrievalError::Io { .. })));
    }

    #[test]
    fn test_source_digest() {
        assert_eq!(
            source_digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
