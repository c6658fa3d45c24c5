// Kuntahaku - Core Library
// Ingestion pipeline and lookup index, shared by the TUI and the CLI

pub mod error;
pub mod config;
pub mod source;
pub mod parser;
pub mod collation;
pub mod ingest;
pub mod index;
pub mod loader;
pub mod format;
pub mod search;

// Re-export commonly used types
pub use error::{CollationError, IngestError, LoadError, RetrievalError};
pub use config::{Config, NumericPolicy};
pub use source::{source_for, ByteSource, FileSource};
#[cfg(feature = "http")]
pub use source::HttpSource;
pub use parser::{AreaRecord, Count, RawRecord};
pub use collation::{Collation, LocaleCollator};
pub use ingest::{ingest, IngestReport, Ingested, Ingestor};
pub use index::{percentage_foreign, AreaIndex};
pub use loader::{load_index, Loaded};
pub use search::SearchState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
