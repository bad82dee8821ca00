//! Registry error types.

use std::path::PathBuf;

/// Errors from loading or saving registry-adjacent documents.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Reading or writing the document failed.
    #[error("registry I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON at all.
    #[error("registry JSON error at {path}: {message}")]
    Json { path: PathBuf, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = RegistryError::Json {
            path: PathBuf::from("/data/listing_ids.json"),
            message: "expected value".into(),
        };
        assert!(err.to_string().contains("listing_ids.json"));
        assert!(err.to_string().contains("expected value"));
    }
}
