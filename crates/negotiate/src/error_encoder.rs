//! Turns a [`HandledError`] into the HTTP response sent to the client.
//!
//! A [`ServiceError`](crate::ServiceError) gets its declared status and an
//! [`ErrorResponse`] body encoded with the codec negotiated from `Accept`. Anything else is
//! an unexpected fault: the client gets a `500` with a plain text body prefixed by a random
//! correlation id, and the same id is logged next to the error so operators can find it.

use crate::body::ResponseBody;
use crate::encoder::{select_encoder, ResponseEncoder};
use crate::handled::{ErrorResponse, HandledError, ServiceError};
use crate::media_type::response_content_type;
use base64::Engine as _;
use http::header::CONTENT_TYPE;
use http::request::Parts;
use http::{HeaderValue, Response, StatusCode};
use rand::RngCore as _;
use std::error::Error as StdError;
use tracing::error;

/// Where error reports go, one call per failure with `key, value` pairs.
#[cfg_attr(test, mockall::automock)]
pub trait ErrorLogger: Send + Sync {
    fn log_error(&self, req: &Parts, fields: &[(&'static str, String)]);
}

/// Reports errors as `tracing` events, with `id`, `error` and `encoding` as event fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl ErrorLogger for TracingLogger {
    fn log_error(&self, req: &Parts, fields: &[(&'static str, String)]) {
        let field = |name: &str| fields.iter().find(|(key, _)| *key == name).map(|(_, value)| value.as_str());
        error!(
            method = %req.method,
            uri = %req.uri,
            id = field("id"),
            error = field("error"),
            encoding = field("encoding"),
            "request failed"
        );
    }
}

/// Encodes errors for one request, with the encoder negotiated from its `Accept` header.
#[derive(Debug)]
pub struct ErrorEncoder<'a, L: ?Sized> {
    req: &'a Parts,
    encoder: ResponseEncoder,
    logger: &'a L,
}

impl<'a, L: ErrorLogger + ?Sized> ErrorEncoder<'a, L> {
    pub fn new(req: &'a Parts, logger: &'a L) -> Self {
        Self { req, encoder: select_encoder(&req.headers), logger }
    }

    pub fn encode(self, handled: HandledError) -> Response<ResponseBody> {
        match handled {
            HandledError::Service(e) => self.encode_service_error(&e),
            HandledError::Unexpected(e) => self.encode_unexpected(&*e),
        }
    }

    fn encode_service_error(self, e: &ServiceError) -> Response<ResponseBody> {
        let ErrorEncoder { req, mut encoder, logger } = self;

        let mut response = Response::new(ResponseBody::empty());
        *response.status_mut() = e.status();
        response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(response_content_type(&req.headers)));

        // status and headers stand even if the body fails, keep what got written
        if let Err(encode_error) = encoder.encode(&ErrorResponse::from(e)) {
            logger.log_error(req, &[("encoding", encode_error.to_string())]);
        }

        *response.body_mut() = encoder.into_body();
        response
    }

    fn encode_unexpected(self, e: &(dyn StdError + Send + Sync)) -> Response<ResponseBody> {
        let id = correlation_id();
        let message = e.to_string();

        let mut response = Response::new(ResponseBody::from(format!("{id}: {message}")));
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        response.headers_mut().insert(CONTENT_TYPE, mime::TEXT_PLAIN.as_ref().parse().unwrap());

        self.logger.log_error(self.req, &[("id", id), ("error", message)]);
        response
    }
}

/// Builds the error response for `handled`, negotiating the body codec from `req`.
pub fn encode_error<L: ErrorLogger + ?Sized>(req: &Parts, logger: &L, handled: HandledError) -> Response<ResponseBody> {
    ErrorEncoder::new(req, logger).encode(handled)
}

/// A short random token: 6 random bytes, url safe base64 without padding.
pub fn correlation_id() -> String {
    let mut buf = [0u8; 6];
    rand::rng().fill_bytes(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf)
}
