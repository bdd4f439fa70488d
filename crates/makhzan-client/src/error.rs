//! Client error vocabulary.
//!
//! Backends report failures with an HTTP-style status and a backend-defined
//! code string. The only distinction the datastore relies on is absence
//! (`NoSuchKey` / `NoSuchBucket`) versus everything else, so absence gets
//! dedicated variants and predicate helpers.

use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Errors reported by an object store backend.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// No object exists at the requested name.
    #[error("no such key: {name}")]
    NoSuchKey { name: String },

    /// The addressed bucket does not exist.
    #[error("no such bucket: {bucket}")]
    NoSuchBucket { bucket: String },

    /// The backend rejected the request with a status and code of its own.
    #[error("{code} (status {status}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// The request never produced a backend response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend does not implement this capability.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

impl ClientError {
    /// True when the error means the requested object is absent.
    pub fn is_no_such_key(&self) -> bool {
        match self {
            ClientError::NoSuchKey { .. } => true,
            ClientError::Api { code, .. } => code == "NoSuchKey",
            _ => false,
        }
    }

    /// True when the error means the backing bucket is absent.
    pub fn is_no_such_bucket(&self) -> bool {
        match self {
            ClientError::NoSuchBucket { .. } => true,
            ClientError::Api { code, .. } => code == "NoSuchBucket",
            _ => false,
        }
    }

    /// True for either form of absence.
    pub fn is_missing(&self) -> bool {
        self.is_no_such_key() || self.is_no_such_bucket()
    }

    /// HTTP-style status, when the backend produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::NoSuchKey { .. } | ClientError::NoSuchBucket { .. } => Some(404),
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Backend-defined error code, when the backend produced one.
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::NoSuchKey { .. } => Some("NoSuchKey"),
            ClientError::NoSuchBucket { .. } => Some("NoSuchBucket"),
            ClientError::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_predicates() {
        let err = ClientError::NoSuchKey {
            name: "data/a".to_string(),
        };
        assert!(err.is_no_such_key());
        assert!(err.is_missing());
        assert!(!err.is_no_such_bucket());
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.code(), Some("NoSuchKey"));
    }

    #[test]
    fn test_api_code_recognized_as_absence() {
        let err = ClientError::Api {
            status: 404,
            code: "NoSuchKey".to_string(),
            message: "The specified key does not exist.".to_string(),
        };
        assert!(err.is_no_such_key());
    }

    #[test]
    fn test_transport_is_not_absence() {
        let err = ClientError::Transport("connection reset".to_string());
        assert!(!err.is_missing());
        assert_eq!(err.status(), None);
        assert_eq!(err.code(), None);
    }
}
