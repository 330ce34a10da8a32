//! Request body decoding driven by the `Content-Type` header.
//!
//! [`select_decoder`] binds one of the codecs to a request body:
//!
//! * `application/json` using `serde_json`
//! * `application/xml` using `quick-xml`
//! * `application/gob` using the MessagePack binary object codec
//!
//! A missing, malformed or unsupported `Content-Type` selects the JSON decoder, selection
//! itself never fails. The body is read once, when [`RequestDecoder::decode`] is awaited.

use crate::codec;
use crate::error::DecodeError;
use crate::MediaType;
use bytes::Bytes;
use http::HeaderMap;
use http_body::Body;
use http_body_util::{BodyExt, Limited};
use serde::de::DeserializeOwned;
use std::error::Error as StdError;
use tracing::trace;

/// The largest request body collected for decoding unless configured otherwise.
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// A codec bound to a request body.
#[derive(Debug)]
pub struct RequestDecoder<B> {
    media_type: MediaType,
    body: B,
    limit: usize,
}

/// Returns a decoder for `body` selected from the request's `Content-Type` header.
pub fn select_decoder<B>(headers: &HeaderMap, body: B) -> RequestDecoder<B> {
    RequestDecoder::new(MediaType::from_content_type(headers), body)
}

impl<B> RequestDecoder<B> {
    pub fn new(media_type: MediaType, body: B) -> Self {
        Self { media_type, body, limit: DEFAULT_BODY_LIMIT }
    }

    /// Sets the maximum number of body bytes read before giving up.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }
}

impl<B> RequestDecoder<B>
where
    B: Body,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    /// Reads the whole body and decodes it into `T`.
    pub async fn decode<T: DeserializeOwned>(self) -> Result<T, DecodeError> {
        let RequestDecoder { media_type, body, limit } = self;

        let bytes: Bytes = Limited::new(body, limit)
            .collect()
            .await
            .map_err(|e| DecodeError::collect(e, limit))?
            .to_bytes();

        trace!(media_type = %media_type, size = bytes.len(), "decoding request body");
        codec::decode(media_type, bytes).map_err(|e| DecodeError::codec(media_type, e))
    }
}
