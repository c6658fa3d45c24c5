// Error taxonomy for the library boundary
// Silent skips (short rows, defaulted counts, no match) are NOT errors

use thiserror::Error;

/// Ingestion failures. Either one aborts the whole run; no records are produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("header not found")]
    HeaderNotFound,

    /// Only raised under `NumericPolicy::Strict`, for retained rows
    #[error("line {line}: could not read {field} from {raw:?}")]
    InvalidCount {
        line: usize,
        field: &'static str,
        raw: String,
    },
}

/// The byte source could not supply the file
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {url}: {message}")]
    Http { url: String, message: String },

    #[error("unsupported source {0} (rebuild with --features http)")]
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("collator unavailable for locale {locale}: {message}")]
pub struct CollationError {
    pub locale: String,
    pub message: String,
}

/// Anything that can stop a load attempt
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error("format error: {0}")]
    Format(#[from] IngestError),

    #[error(transparent)]
    Collation(#[from] CollationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_not_found_message() {
        assert_eq!(IngestError::HeaderNotFound.to_string(), "header not found");
    }

    #[test]
    fn test_load_error_wraps_format_error() {
        let err: LoadError = IngestError::HeaderNotFound.into();
        assert!(matches!(err, LoadError::Format(IngestError::HeaderNotFound)));
        assert_eq!(err.to_string(), "format error: header not found");
    }

    #[test]
    fn test_invalid_count_message() {
        let err = IngestError::InvalidCount {
            line: 12,
            field: "total_enrolled",
            raw: "..".to_string(),
        };
        assert_eq!(err.to_string(), "line 12: could not read total_enrolled from \"..\"");
    }
}
