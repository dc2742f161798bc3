use http::{HeaderName, HeaderValue, Response, StatusCode, Version};

use crate::ext::HeaderMapExt;
use crate::Error;

/// Max number of headers to parse from an HTTP response
pub const MAX_RESPONSE_HEADERS: usize = 128;

/// Try to parse a complete HTTP/1.x response from `input`.
///
/// Returns `Ok(None)` if more input is needed. The body is delimited by
/// `content-length`. Without one, everything after the head is the body,
/// which means the caller must only hand over the input once the connection
/// is closed. Chunked bodies must be de-chunked by the caller.
pub(crate) fn try_parse_response(input: &[u8]) -> Result<Option<(usize, Response<Vec<u8>>)>, Error> {
    let Some((head_len, head)) = try_parse_head(input)? else {
        return Ok(None);
    };

    if head.headers().is_chunked() {
        return Err(Error::BodyIsChunked);
    }

    let rest = &input[head_len..];

    let body_len = match head.headers().content_length()? {
        Some(n) if n > rest.len() => return Ok(None),
        Some(n) => n,
        None => rest.len(),
    };

    let (parts, _) = head.into_parts();
    let response = Response::from_parts(parts, rest[..body_len].to_vec());

    Ok(Some((head_len + body_len, response)))
}

fn try_parse_head(input: &[u8]) -> Result<Option<(usize, Response<()>)>, Error> {
    let mut headers = [httparse::EMPTY_HEADER; MAX_RESPONSE_HEADERS];
    let mut res = httparse::Response::new(&mut headers);

    let input_used = match res.parse(input) {
        Ok(httparse::Status::Complete(v)) => v,
        Ok(httparse::Status::Partial) => return Ok(None),
        Err(httparse::Error::TooManyHeaders) => return Err(Error::HttpParseTooManyHeaders),
        Err(e) => return Err(e.into()),
    };

    let version = match res.version {
        Some(0) => Version::HTTP_10,
        Some(1) => Version::HTTP_11,
        _ => return Err(Error::HttpParseFail("unsupported http version".into())),
    };

    let status = res
        .code
        .and_then(|c| StatusCode::from_u16(c).ok())
        .ok_or_else(|| Error::HttpParseFail("bad status code".into()))?;

    let mut builder = Response::builder().version(version).status(status);

    for h in res.headers.iter() {
        let name = HeaderName::from_bytes(h.name.as_bytes())
            .map_err(|_| Error::BadHeader(h.name.to_string()))?;
        let value = HeaderValue::from_bytes(h.value)
            .map_err(|_| Error::BadHeader(h.name.to_string()))?;
        builder = builder.header(name, value);
    }

    let response = builder
        .body(())
        .map_err(|e| Error::HttpParseFail(e.to_string()))?;

    Ok(Some((input_used, response)))
}
