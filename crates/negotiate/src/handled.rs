//! The errors a request handler hands back to be reported to the client.
//!
//! A [`HandledError`] is either a [`ServiceError`], which carries the HTTP status and
//! message meant for the client, or an unexpected fault that is reported opaquely.

use crate::error::DecodeError;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use thiserror::Error;

/// An error with a declared HTTP status and a client facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ServiceError {
    status: StatusCode,
    message: String,
    id: Option<String>,
}

impl ServiceError {
    pub fn new<S: ToString>(status: StatusCode, message: S) -> Self {
        Self { status, message: message.to_string(), id: None }
    }

    pub fn bad_request<S: ToString>(message: S) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized<S: ToString>(message: S) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden<S: ToString>(message: S) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found<S: ToString>(message: S) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict<S: ToString>(message: S) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn unprocessable<S: ToString>(message: S) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    /// Attaches an identifier the client can quote back.
    #[must_use]
    pub fn with_id<S: ToString>(mut self, id: S) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl From<DecodeError> for ServiceError {
    fn from(e: DecodeError) -> Self {
        match e {
            DecodeError::TooLarge { .. } => Self::new(StatusCode::PAYLOAD_TOO_LARGE, e),
            _ => Self::bad_request(e),
        }
    }
}

/// Either a [`ServiceError`] or any other error, which is treated as an unexpected fault.
#[derive(Error, Debug)]
pub enum HandledError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("{0}")]
    Unexpected(Box<dyn StdError + Send + Sync>),
}

impl HandledError {
    pub fn unexpected<E: Into<Box<dyn StdError + Send + Sync>>>(e: E) -> Self {
        Self::Unexpected(e.into())
    }
}

impl From<DecodeError> for HandledError {
    fn from(e: DecodeError) -> Self {
        Self::Service(e.into())
    }
}

/// The payload sent back for a [`ServiceError`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl From<&ServiceError> for ErrorResponse {
    fn from(e: &ServiceError) -> Self {
        Self { status: e.status.as_u16(), message: e.message.clone(), id: e.id.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_constructors() {
        let e = ServiceError::not_found("account 42");
        assert_eq!(e.status(), StatusCode::NOT_FOUND);
        assert_eq!(e.message(), "account 42");
        assert_eq!(e.id(), None);
        assert_eq!(e.to_string(), "account 42");

        let e = ServiceError::conflict("taken").with_id("x1");
        assert_eq!(e.status(), StatusCode::CONFLICT);
        assert_eq!(e.id(), Some("x1"));
    }

    #[test]
    fn test_decode_error_is_classified() {
        let handled = HandledError::from(DecodeError::body("unexpected eof"));
        match handled {
            HandledError::Service(e) => {
                assert_eq!(e.status(), StatusCode::BAD_REQUEST);
                assert!(e.message().contains("unexpected eof"));
            }
            HandledError::Unexpected(_) => panic!("decode errors are client errors"),
        }

        let too_large = ServiceError::from(DecodeError::TooLarge { limit: 16 });
        assert_eq!(too_large.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_unexpected_keeps_message() {
        let handled = HandledError::unexpected(io::Error::other("disk on fire"));
        assert!(matches!(handled, HandledError::Unexpected(_)));
        assert_eq!(handled.to_string(), "disk on fire");

        let handled = HandledError::unexpected("plain message");
        assert_eq!(handled.to_string(), "plain message");
    }

    #[test]
    fn test_error_response_skips_missing_id() {
        let response = ErrorResponse::from(&ServiceError::not_found("not found"));
        assert_eq!(serde_json::to_string(&response).unwrap(), r#"{"status":404,"message":"not found"}"#);

        let response = ErrorResponse::from(&ServiceError::bad_request("bad").with_id("abc"));
        assert_eq!(serde_json::to_string(&response).unwrap(), r#"{"status":400,"message":"bad","id":"abc"}"#);
    }
}
