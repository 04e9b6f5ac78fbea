//! Error types for teach runs and service calls

use thiserror::Error;

/// Failures reported by the classification service client
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request never produced a response (connect, timeout, TLS)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with an error status or `success: false`
    #[error("service error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be decoded
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The endpoint URL could not be built
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Terminal outcome of a teach run
///
/// Any variant carrying a `position` means every example before it was
/// already taught and nothing at or after it is confirmed.
#[derive(Debug, Error)]
pub enum TeachError {
    /// Model identifiers must be non-empty
    #[error("invalid model id: {0:?}")]
    InvalidModelId(String),

    /// The example source could not be opened
    #[error("example source {path} unavailable: {source}")]
    SourceUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The source is not a properly delimited array
    #[error("malformed example container at byte {offset}: {reason}")]
    MalformedContainer { offset: u64, reason: String },

    /// An element could not be parsed as an example
    #[error("example {position} could not be decoded: {source}")]
    Decode {
        position: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Reading from an already opened source failed
    #[error("read failed before example {position}: {source}")]
    Read {
        position: usize,
        #[source]
        source: std::io::Error,
    },

    /// The service did not accept a decoded example
    #[error("example {position} was not accepted: {source}")]
    Submission {
        position: usize,
        #[source]
        source: ServiceError,
    },
}

impl TeachError {
    /// Ordinal of the example the run stopped at, if one was reached
    pub fn position(&self) -> Option<usize> {
        match self {
            TeachError::Decode { position, .. }
            | TeachError::Read { position, .. }
            | TeachError::Submission { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// Result type for teach operations
pub type Result<T> = std::result::Result<T, TeachError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_only_for_record_errors() {
        let err = TeachError::MalformedContainer {
            offset: 0,
            reason: "expected '['".to_string(),
        };
        assert_eq!(err.position(), None);

        let err = TeachError::Submission {
            position: 4,
            source: ServiceError::Api {
                status: 400,
                message: "unknown class".to_string(),
            },
        };
        assert_eq!(err.position(), Some(4));
        assert!(err.to_string().contains("example 4"));
    }
}
