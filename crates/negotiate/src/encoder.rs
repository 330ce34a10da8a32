//! Response body encoding driven by the request's `Accept` header.
//!
//! [`select_encoder`] applies the same parsing and JSON fallback as the decoder side. The
//! returned [`ResponseEncoder`] only produces the body; the `Content-Type` header has to be
//! set from [`response_content_type`](crate::response_content_type).

use crate::body::ResponseBody;
use crate::codec::{self, Writer};
use crate::error::EncodeError;
use crate::MediaType;
use bytes::Bytes;
use http::HeaderMap;
use serde::Serialize;

/// A codec bound to a response output buffer.
#[derive(Debug)]
pub struct ResponseEncoder {
    media_type: MediaType,
    writer: Writer,
}

/// Returns an encoder selected from the request's `Accept` header.
pub fn select_encoder(headers: &HeaderMap) -> ResponseEncoder {
    ResponseEncoder::new(MediaType::from_accept(headers))
}

impl ResponseEncoder {
    pub fn new(media_type: MediaType) -> Self {
        Self { media_type, writer: Writer::new() }
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// Appends the encoded `value` to the output.
    ///
    /// On failure, whatever the codec already wrote stays in the output.
    pub fn encode<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), EncodeError> {
        codec::encode(self.media_type, value, &mut self.writer).map_err(|e| EncodeError::new(self.media_type, e))
    }

    /// Takes the bytes written so far.
    pub fn take(&mut self) -> Bytes {
        self.writer.take()
    }

    pub fn into_body(mut self) -> ResponseBody {
        ResponseBody::once(self.writer.take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::ACCEPT;
    use http::HeaderValue;
    use serde::ser::Error as _;
    use serde::Serializer;

    #[derive(Serialize)]
    struct Greeting {
        text: &'static str,
    }

    fn accept(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_select() {
        assert_eq!(select_encoder(&HeaderMap::new()).media_type(), MediaType::Json);
        assert_eq!(select_encoder(&accept("application/json")).media_type(), MediaType::Json);
        assert_eq!(select_encoder(&accept("application/gob")).media_type(), MediaType::Gob);
        assert_eq!(select_encoder(&accept("application/xml; charset=utf-8")).media_type(), MediaType::Xml);
        assert_eq!(select_encoder(&accept("text/html")).media_type(), MediaType::Json);
        assert_eq!(select_encoder(&accept("")).media_type(), MediaType::Json);
    }

    #[test]
    fn test_encode_json() {
        let mut encoder = select_encoder(&accept("application/json"));
        encoder.encode(&Greeting { text: "hi" }).unwrap();

        assert_eq!(encoder.into_body().as_bytes(), br#"{"text":"hi"}"#);
    }

    #[test]
    fn test_encode_xml() {
        let mut encoder = select_encoder(&accept("application/xml"));
        encoder.encode(&Greeting { text: "hi" }).unwrap();

        assert_eq!(encoder.into_body().as_bytes(), b"<Greeting><text>hi</text></Greeting>");
    }

    #[test]
    fn test_encode_gob() {
        let mut encoder = select_encoder(&accept("application/gob"));
        encoder.encode(&Greeting { text: "hi" }).unwrap();

        let expected = rmp_serde::to_vec_named(&Greeting { text: "hi" }).unwrap();
        assert_eq!(encoder.into_body().as_bytes(), expected.as_slice());
    }

    #[test]
    fn test_encode_appends() {
        let mut encoder = select_encoder(&HeaderMap::new());
        encoder.encode(&1).unwrap();
        encoder.encode(&2).unwrap();

        assert_eq!(encoder.take(), Bytes::from_static(b"12"));
        assert!(encoder.into_body().as_bytes().is_empty());
    }

    #[test]
    fn test_encode_failure() {
        struct Broken;

        impl Serialize for Broken {
            fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
                Err(S::Error::custom("broken value"))
            }
        }

        let mut encoder = select_encoder(&HeaderMap::new());
        let error = encoder.encode(&Broken).unwrap_err();

        assert_eq!(error.media_type(), MediaType::Json);
        assert!(error.to_string().contains("broken value"));
    }
}
