//! Content negotiation for micro services.
//!
//! This crate picks the codec a request body is read with and the codec a response body is
//! written with, based on the `Content-Type` and `Accept` headers, and turns handler errors
//! into client responses.
//!
//! # Supported media types
//!
//! - `application/json` using `serde_json`
//! - `application/xml` using `quick-xml`
//! - `application/gob`, a binary object codec backed by MessagePack (`rmp-serde`)
//!
//! A missing, malformed or unsupported header never fails the request: it falls back to
//! JSON. `Accept` is matched as a single media type, lists and wildcards fall back too.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use http::{header, Request, StatusCode};
//! use http_body_util::Full;
//! use micro_negotiate::{
//!     encode_error, response_content_type, select_decoder, select_encoder, ServiceError, TracingLogger,
//! };
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Deserialize, Serialize)]
//! struct Account {
//!     name: String,
//! }
//!
//! # tokio_test_block_on(async {
//! let request = Request::builder()
//!     .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
//!     .header(header::ACCEPT, "application/xml")
//!     .body(Full::new(Bytes::from_static(br#"{"name":"zava"}"#)))
//!     .unwrap();
//! let (parts, body) = request.into_parts();
//!
//! let account: Account = select_decoder(&parts.headers, body).decode().await.unwrap();
//!
//! let mut encoder = select_encoder(&parts.headers);
//! encoder.encode(&account).unwrap();
//! assert_eq!(response_content_type(&parts.headers), "application/xml");
//! assert_eq!(encoder.into_body().as_bytes(), b"<Account><name>zava</name></Account>");
//!
//! let response = encode_error(&parts, &TracingLogger, ServiceError::not_found("no such account").into());
//! assert_eq!(response.status(), StatusCode::NOT_FOUND);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod body;
mod codec;
mod decoder;
mod encoder;
mod error;
mod error_encoder;
mod handled;
mod media_type;

pub use body::ResponseBody;
pub use decoder::select_decoder;
pub use decoder::RequestDecoder;
pub use decoder::DEFAULT_BODY_LIMIT;
pub use encoder::select_encoder;
pub use encoder::ResponseEncoder;
pub use error::CodecError;
pub use error::DecodeError;
pub use error::EncodeError;
pub use error_encoder::correlation_id;
pub use error_encoder::encode_error;
pub use error_encoder::ErrorEncoder;
pub use error_encoder::ErrorLogger;
pub use error_encoder::TracingLogger;
pub use handled::ErrorResponse;
pub use handled::HandledError;
pub use handled::ServiceError;
pub use media_type::parse_media_type;
pub use media_type::response_content_type;
pub use media_type::MediaType;
