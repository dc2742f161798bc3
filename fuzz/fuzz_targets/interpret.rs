#![no_main]

use libfuzzer_sys::fuzz_target;
use soap_proto::http::{HeaderMap, HeaderValue};
use soap_proto::interpret;

// Content types to pick from, the charset decides how the body is decoded
const CONTENT_TYPES: &[&str] = &[
    "text/xml",
    "text/xml; charset=utf-8",
    "text/xml; charset=\"ISO-8859-1\"",
    "application/soap+xml; charset=utf-16",
    "text/xml; charset=bogus",
];

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let mut headers = HeaderMap::new();
    let idx = (data[0] as usize) % CONTENT_TYPES.len();
    headers.insert(
        "content-type",
        HeaderValue::from_static(CONTENT_TYPES[idx]),
    );

    // Whatever the input, the result is either an object or an error.
    let _ = interpret(&data[1..], &headers);
});
