//! Error types for an update cycle.

use thiserror::Error;

use crate::config::ConfigError;
use crate::fetcher::FetchError;

/// Why an update cycle failed.
///
/// Every variant is handled the same way by the updater: the error marker is
/// set and the failure is logged. The variants exist for logging and for
/// hosts that want to inspect the outcome.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// Invalid units or missing station code, caught before any request
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Request failed, returned a non-200 status, or the body was not JSON
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// The document is missing `properties` or a required measurement
    #[error("Schema error: {0}")]
    Schema(String),

    /// Anything else that went wrong while converting the observation
    #[error("Unhandled error: {0}")]
    Unhandled(String),
}

/// Coarse failure taxonomy for an update cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Transport,
    Decode,
    Schema,
    Unhandled,
}

impl UpdateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UpdateError::Config(_) => ErrorKind::Config,
            UpdateError::Fetch(FetchError::Decode(_)) => ErrorKind::Decode,
            UpdateError::Fetch(_) => ErrorKind::Transport,
            UpdateError::Schema(_) => ErrorKind::Schema,
            UpdateError::Unhandled(_) => ErrorKind::Unhandled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let config: UpdateError = ConfigError::MissingStation.into();
        assert_eq!(config.kind(), ErrorKind::Config);

        let status: UpdateError = FetchError::Status(503).into();
        assert_eq!(status.kind(), ErrorKind::Transport);

        let bad_json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let decode: UpdateError = FetchError::Decode(bad_json).into();
        assert_eq!(decode.kind(), ErrorKind::Decode);

        assert_eq!(
            UpdateError::Schema("no properties".into()).kind(),
            ErrorKind::Schema
        );
        assert_eq!(
            UpdateError::Unhandled("overflow".into()).kind(),
            ErrorKind::Unhandled
        );
    }

    #[test]
    fn test_display() {
        let err: UpdateError = FetchError::Status(500).into();
        assert_eq!(err.to_string(), "Fetch error: bad response status 500");
    }
}
