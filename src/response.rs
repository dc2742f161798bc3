//! Interpreting a received response.

use std::borrow::Cow;

use encoding_rs::Encoding;
use http::{HeaderMap, Response};

use crate::cache::CacheEntry;
use crate::ext::HeaderMapExt;
use crate::object::SoapObject;
use crate::util::log_data;
use crate::xml::parse_envelope;
use crate::{Error, CHARSET};

/// A successfully interpreted response.
#[derive(Debug, Clone, PartialEq)]
pub struct SoapResponse {
    object: SoapObject,
    cache: Option<CacheEntry>,
}

impl SoapResponse {
    /// The object in the response body.
    pub fn object(&self) -> &SoapObject {
        &self.object
    }

    /// Caching metadata. `None` if the response must not be cached.
    pub fn cache_entry(&self) -> Option<&CacheEntry> {
        self.cache.as_ref()
    }

    /// Take the object.
    pub fn into_object(self) -> SoapObject {
        self.object
    }
}

/// Interpret a response body.
///
/// The charset is taken from the `Content-Type` header and defaults to
/// UTF-8. The HTTP status is deliberately not considered: servers send faults
/// with a `500` status and those must still be read.
pub fn interpret(body: &[u8], headers: &HeaderMap) -> Result<SoapResponse, Error> {
    let now = chrono::Utc::now().timestamp_millis();
    interpret_at(body, headers, now)
}

/// [`interpret`] for an `http::Response`.
pub fn interpret_response(response: &Response<Vec<u8>>) -> Result<SoapResponse, Error> {
    interpret(response.body(), response.headers())
}

pub(crate) fn interpret_at(
    body: &[u8],
    headers: &HeaderMap,
    now: i64,
) -> Result<SoapResponse, Error> {
    log_data("<< ", body);

    let text = decode_body(body, headers)?;

    let object = parse_envelope(&text)?.ok_or(Error::EmptyResponse)?;

    let cache = CacheEntry::parse(headers, now);

    Ok(SoapResponse { object, cache })
}

/// Decode a body using the charset declared in the headers.
///
/// Only an unknown charset is an error. Byte sequences that are invalid in the
/// charset are replaced with U+FFFD and the text is handed on.
pub fn decode_body<'a>(body: &'a [u8], headers: &HeaderMap) -> Result<Cow<'a, str>, Error> {
    let label = headers.charset().unwrap_or(CHARSET);

    let encoding = Encoding::for_label(label.as_bytes())
        .ok_or_else(|| Error::Decoding(format!("unsupported charset: {}", label)))?;

    let (text, had_errors) = encoding.decode_with_bom_removal(body);

    if had_errors {
        debug!("Replaced invalid {} in response body", encoding.name());
    }

    Ok(text)
}
