//! Error taxonomy shared by the history, state, and action layers.
//!
//! Library calls return [`Result<T>`]; the [`action`](crate::action)
//! dispatcher folds every variant into a `{success: false, error}` envelope,
//! so nothing here is fatal to the process.

use std::path::PathBuf;

/// Convenience alias used throughout the crate.
pub type Result<T, E = CompressorError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum CompressorError {
    /// A required input was missing or did not match its schema.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A summary was requested over zero messages.
    #[error("no messages available to summarize")]
    EmptyWindow,

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON, either in a file (`path` set) or an inline request.
    #[error("failed to decode {}: {source}", path.as_ref().map_or_else(|| "request".to_string(), |p| p.display().to_string()))]
    Decode {
        path: Option<PathBuf>,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode state: {0}")]
    Encode(#[source] serde_json::Error),
}

impl CompressorError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn decode(path: Option<PathBuf>, source: serde_json::Error) -> Self {
        Self::Decode { path, source }
    }

    /// Short machine-friendly name for the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::EmptyWindow => "empty_window",
            Self::Io { .. } => "io",
            Self::Decode { .. } => "decode",
            Self::Encode(_) => "encode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_mentions_path() {
        let err = CompressorError::io(
            "/tmp/missing.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        let text = err.to_string();
        assert!(text.contains("/tmp/missing.json"));
        assert_eq!(err.kind(), "io");
    }

    #[test]
    fn decode_error_without_path_says_request() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = CompressorError::decode(None, source);
        assert!(err.to_string().starts_with("failed to decode request"));
        assert_eq!(err.kind(), "decode");
    }

    #[test]
    fn empty_window_has_stable_message() {
        assert_eq!(
            CompressorError::EmptyWindow.to_string(),
            "no messages available to summarize"
        );
    }
}
