//! Media type parsing and matching for the `Content-Type` and `Accept` headers.
//!
//! Header values are reduced to their base media type before matching: parameters such
//! as `charset=utf-8` are dropped and the type/subtype is lower-cased. A value that can't
//! be parsed is kept as it is, so it only matches when it is already one of the supported
//! strings. Everything that doesn't match falls back to [`MediaType::Json`].

use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use tracing::trace;

/// The media types this crate can decode and encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MediaType {
    /// `application/json`
    #[default]
    Json,
    /// `application/gob`, the binary object codec
    Gob,
    /// `application/xml`
    Xml,
}

impl MediaType {
    pub const APPLICATION_JSON: &'static str = "application/json";
    pub const APPLICATION_GOB: &'static str = "application/gob";
    pub const APPLICATION_XML: &'static str = "application/xml";

    /// Returns the media type string, e.g. `application/json`.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Json => Self::APPLICATION_JSON,
            MediaType::Gob => Self::APPLICATION_GOB,
            MediaType::Xml => Self::APPLICATION_XML,
        }
    }

    /// Exact match against the supported media type strings.
    pub fn from_essence(essence: &str) -> Option<Self> {
        match essence {
            json if json == mime::APPLICATION_JSON.essence_str() => Some(MediaType::Json),
            Self::APPLICATION_GOB => Some(MediaType::Gob),
            Self::APPLICATION_XML => Some(MediaType::Xml),
            _ => None,
        }
    }

    /// Resolves a raw header value, falling back to JSON when the header is absent
    /// or names an unsupported media type.
    pub fn from_header(value: Option<&HeaderValue>) -> Self {
        let Some(value) = value else {
            return MediaType::Json;
        };

        // a value that isn't visible ascii can't be one of ours
        let Ok(raw) = value.to_str() else {
            trace!(header = ?value, "non ascii media type, fallback to json");
            return MediaType::Json;
        };

        match Self::from_essence(&parse_media_type(raw)) {
            Some(media_type) => media_type,
            None => {
                trace!(header = raw, "unsupported media type, fallback to json");
                MediaType::Json
            }
        }
    }

    /// The media type a request body is decoded with, from its `Content-Type`.
    pub fn from_content_type(headers: &HeaderMap) -> Self {
        Self::from_header(headers.get(CONTENT_TYPE))
    }

    /// The media type a response body is encoded with, from the request's `Accept`.
    pub fn from_accept(headers: &HeaderMap) -> Self {
        Self::from_header(headers.get(ACCEPT))
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strips the parameters off a header value, returning the lower-cased `type/subtype`.
///
/// Whitespace around the media type and around each `;` is allowed. If the media type or
/// one of the parameters is malformed, or a parameter name repeats, the value is returned
/// unmodified.
pub fn parse_media_type(raw: &str) -> Cow<'_, str> {
    match essence(raw) {
        Some(essence) => Cow::Owned(essence),
        None => Cow::Borrowed(raw),
    }
}

fn essence(raw: &str) -> Option<String> {
    let (base, mut rest) = raw.split_at(raw.find(';').unwrap_or(raw.len()));

    let essence = base.trim().to_ascii_lowercase();
    if !is_valid_essence(&essence) {
        return None;
    }

    let mut names = HashSet::new();
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        match consume_param(rest) {
            Some((name, next)) if names.insert(name.clone()) => rest = next,
            Some(_) => return None,
            // a dangling `;` at the end is tolerated
            None if rest.trim() == ";" => break,
            None => return None,
        }
    }

    Some(essence)
}

fn is_tspecial(c: char) -> bool {
    "()<>@,;:\\\"/[]?=".contains(c)
}

fn is_token_char(c: char) -> bool {
    c.is_ascii() && c > ' ' && c != '\x7f' && !is_tspecial(c)
}

fn consume_token(v: &str) -> (&str, &str) {
    v.split_at(v.find(|c| !is_token_char(c)).unwrap_or(v.len()))
}

/// `type` or `type/subtype`, nothing else.
fn is_valid_essence(essence: &str) -> bool {
    let (top, rest) = consume_token(essence);
    if top.is_empty() {
        return false;
    }
    if rest.is_empty() {
        return true;
    }
    let Some(rest) = rest.strip_prefix('/') else {
        return false;
    };
    let (sub, rest) = consume_token(rest);
    !sub.is_empty() && rest.is_empty()
}

/// Consumes `; name=value`, returning the lower-cased name and the remaining input.
fn consume_param(v: &str) -> Option<(String, &str)> {
    let rest = v.trim_start().strip_prefix(';')?.trim_start();
    let (name, rest) = consume_token(rest);
    if name.is_empty() {
        return None;
    }
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let rest = consume_value(rest)?;
    Some((name.to_ascii_lowercase(), rest))
}

/// Consumes a token or a quoted string, returning the remaining input.
fn consume_value(v: &str) -> Option<&str> {
    let Some(quoted) = v.strip_prefix('"') else {
        let (token, rest) = consume_token(v);
        return if token.is_empty() { None } else { Some(rest) };
    };

    let mut chars = quoted.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some(&quoted[i + 1..]),
            '\\' if quoted[i + 1..].starts_with(is_tspecial) => {
                chars.next();
            }
            '\r' | '\n' => return None,
            _ => {}
        }
    }
    None
}

/// Returns the value of the `Content-Type` header to send back for the given request headers.
///
/// The encoders don't set any header, callers must set this one explicitly.
pub fn response_content_type(headers: &HeaderMap) -> &'static str {
    MediaType::from_accept(headers).as_str()
}
