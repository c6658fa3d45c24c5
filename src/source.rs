// Byte sources - where the CSV export comes from
// One fetch, whole buffer, no retries

use std::fs;
use std::path::PathBuf;

use crate::error::RetrievalError;

/// Supplies the complete source file
pub trait ByteSource {
    fn fetch(&self) -> Result<Vec<u8>, RetrievalError>;

    /// Human-readable location for logs
    fn describe(&self) -> String;
}

// ============================================================================
// FILE
// ============================================================================

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        FileSource { path: path.into() }
    }
}

impl ByteSource for FileSource {
    fn fetch(&self) -> Result<Vec<u8>, RetrievalError> {
        fs::read(&self.path).map_err(|source| RetrievalError::Io {
            path: self.path.display().to_string(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ============================================================================
// HTTP
// ============================================================================

#[cfg(feature = "http")]
pub struct HttpSource {
    url: String,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpSource {
    pub fn new(url: &str) -> Self {
        HttpSource {
            url: url.to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    fn http_error(&self, err: reqwest::Error) -> RetrievalError {
        RetrievalError::Http {
            url: self.url.clone(),
            message: err.to_string(),
        }
    }
}

#[cfg(feature = "http")]
impl ByteSource for HttpSource {
    fn fetch(&self) -> Result<Vec<u8>, RetrievalError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| self.http_error(e))?;

        let body = response.bytes().map_err(|e| self.http_error(e))?;
        Ok(body.to_vec())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

// ============================================================================
// IN MEMORY
// ============================================================================

impl ByteSource for Vec<u8> {
    fn fetch(&self) -> Result<Vec<u8>, RetrievalError> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        format!("<{} bytes in memory>", self.len())
    }
}

impl ByteSource for &[u8] {
    fn fetch(&self) -> Result<Vec<u8>, RetrievalError> {
        Ok(self.to_vec())
    }

    fn describe(&self) -> String {
        format!("<{} bytes in memory>", self.len())
    }
}

fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// HTTP for http(s) URLs, the filesystem for anything else
pub fn source_for(location: &str) -> Result<Box<dyn ByteSource>, RetrievalError> {
    if is_url(location) {
        #[cfg(feature = "http")]
        {
            return Ok(Box::new(HttpSource::new(location)));
        }
        #[cfg(not(feature = "http"))]
        {
            return Err(RetrievalError::Unsupported(location.to_string()));
        }
    }

    Ok(Box::new(FileSource::new(location)))
}
