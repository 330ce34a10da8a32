use std::error::Error as StdError;
use std::io;
use thiserror::Error;

use crate::MediaType;

/// Errors raised by one of the three codecs.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("json codec error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("xml codec error: {reason}")]
    Xml { reason: String },

    #[error("gob codec error: {reason}")]
    Gob { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl CodecError {
    pub fn xml<S: ToString>(str: S) -> Self {
        Self::Xml { reason: str.to_string() }
    }

    pub fn gob<S: ToString>(str: S) -> Self {
        Self::Gob { reason: str.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("request body exceed the limit {limit}")]
    TooLarge { limit: usize },

    #[error("failed to read request body: {reason}")]
    Body { reason: String },

    #[error("invalid {media_type} body: {source}")]
    Codec { media_type: MediaType, source: CodecError },
}

impl DecodeError {
    pub fn body<S: ToString>(str: S) -> Self {
        Self::Body { reason: str.to_string() }
    }

    pub fn codec(media_type: MediaType, source: CodecError) -> Self {
        Self::Codec { media_type, source }
    }

    /// Sorts a body collection failure into [`DecodeError::TooLarge`] or [`DecodeError::Body`].
    pub(crate) fn collect(e: Box<dyn StdError + Send + Sync>, limit: usize) -> Self {
        if e.is::<http_body_util::LengthLimitError>() {
            Self::TooLarge { limit }
        } else {
            Self::body(e)
        }
    }
}

#[derive(Error, Debug)]
#[error("failed to encode {media_type} response: {source}")]
pub struct EncodeError {
    media_type: MediaType,
    #[source]
    source: CodecError,
}

impl EncodeError {
    pub fn new(media_type: MediaType, source: CodecError) -> Self {
        Self { media_type, source }
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }
}
