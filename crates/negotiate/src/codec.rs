//! The body codecs behind each [`MediaType`].
//!
//! - JSON using `serde_json`
//! - XML using `quick-xml`'s serde support
//! - the binary object codec (`application/gob`) using MessagePack via `rmp-serde`
//!
//! The binary codec always writes structs as maps (`to_vec_named` style) so that a
//! payload stays self-describing, the same way a gob stream carries its field names.

use crate::error::CodecError;
use crate::MediaType;
use bytes::{Buf, Bytes, BytesMut};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;
use std::io::Write;

/// An in-memory sink the encoders write to; its content becomes the response body.
#[derive(Debug)]
pub(crate) struct Writer {
    buf: BytesMut,
}

impl Writer {
    pub(crate) fn new() -> Self {
        Self { buf: BytesMut::with_capacity(1024) }
    }

    pub(crate) fn take(&mut self) -> Bytes {
        self.buf.split().freeze()
    }
}

impl io::Write for Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Encodes `value` with the codec of `media_type`, appending to `writer`.
pub(crate) fn encode<T, W>(media_type: MediaType, value: &T, writer: &mut W) -> Result<(), CodecError>
where
    T: Serialize + ?Sized,
    W: Write,
{
    match media_type {
        MediaType::Json => serde_json::to_writer(writer, value).map_err(CodecError::from),
        MediaType::Gob => rmp_serde::encode::write_named(writer, value).map_err(CodecError::gob),
        MediaType::Xml => {
            let xml = quick_xml::se::to_string(value).map_err(CodecError::xml)?;
            writer.write_all(xml.as_bytes())?;
            Ok(())
        }
    }
}

/// Decodes a complete body with the codec of `media_type`.
pub(crate) fn decode<T: DeserializeOwned>(media_type: MediaType, body: Bytes) -> Result<T, CodecError> {
    match media_type {
        MediaType::Json => serde_json::from_slice(&body).map_err(CodecError::from),
        MediaType::Gob => rmp_serde::from_slice(&body).map_err(CodecError::gob),
        MediaType::Xml => quick_xml::de::from_reader(body.reader()).map_err(CodecError::xml),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Account {
        id: u32,
        name: String,
    }

    fn account() -> Account {
        Account { id: 7, name: "goa".to_string() }
    }

    #[test]
    fn test_writer_take() {
        let mut writer = Writer::new();
        writer.write_all(b"hello").unwrap();
        assert_eq!(writer.take(), Bytes::from_static(b"hello"));
        assert!(writer.take().is_empty());
    }

    #[test]
    fn test_json_layout() {
        let mut writer = Writer::new();
        encode(MediaType::Json, &account(), &mut writer).unwrap();
        assert_eq!(writer.take(), Bytes::from_static(br#"{"id":7,"name":"goa"}"#));
    }

    #[test]
    fn test_xml_layout() {
        let mut writer = Writer::new();
        encode(MediaType::Xml, &account(), &mut writer).unwrap();
        assert_eq!(writer.take(), Bytes::from_static(b"<Account><id>7</id><name>goa</name></Account>"));
    }

    #[test]
    fn test_gob_keeps_field_names() {
        let mut writer = Writer::new();
        encode(MediaType::Gob, &account(), &mut writer).unwrap();
        let bytes = writer.take();

        let decoded: Account = decode(MediaType::Gob, bytes.clone()).unwrap();
        assert_eq!(decoded, account());

        // named struct encoding is readable as a plain map
        let as_map: std::collections::HashMap<String, serde_json::Value> = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(as_map.len(), 2);
    }

    #[test]
    fn test_decode_each_codec() {
        let json: Account = decode(MediaType::Json, Bytes::from_static(br#"{"id":7,"name":"goa"}"#)).unwrap();
        assert_eq!(json, account());

        let xml: Account =
            decode(MediaType::Xml, Bytes::from_static(b"<Account><id>7</id><name>goa</name></Account>")).unwrap();
        assert_eq!(xml, account());
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(decode::<Account>(MediaType::Json, Bytes::from_static(b"<nope>")), Err(CodecError::Json { .. })));
        assert!(matches!(decode::<Account>(MediaType::Gob, Bytes::from_static(b"{}")), Err(CodecError::Gob { .. })));
        assert!(matches!(decode::<Account>(MediaType::Xml, Bytes::from_static(b"<Account><id>seven</id></Account>")), Err(CodecError::Xml { .. })));
    }
}
