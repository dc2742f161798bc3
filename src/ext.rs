use http::header::{self, AsHeaderName};
use http::HeaderMap;

use crate::Error;

pub(crate) trait HeaderMapExt {
    fn get_str<K: AsHeaderName>(&self, key: K) -> Option<&str>;
    fn charset(&self) -> Option<&str>;
    fn content_length(&self) -> Result<Option<usize>, Error>;
    fn is_chunked(&self) -> bool;
}

impl HeaderMapExt for HeaderMap {
    fn get_str<K: AsHeaderName>(&self, key: K) -> Option<&str> {
        self.get(key).and_then(|v| v.to_str().ok())
    }

    fn charset(&self) -> Option<&str> {
        let content_type = self.get_str(header::CONTENT_TYPE)?;

        content_type.split(';').skip(1).find_map(|param| {
            let (key, value) = param.split_once('=')?;
            if key.trim().eq_ignore_ascii_case("charset") {
                Some(value.trim().trim_matches('"'))
            } else {
                None
            }
        })
    }

    fn content_length(&self) -> Result<Option<usize>, Error> {
        let Some(v) = self.get(header::CONTENT_LENGTH) else {
            return Ok(None);
        };

        let len = v
            .to_str()
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .ok_or(Error::BadContentLengthHeader)?;

        Ok(Some(len))
    }

    fn is_chunked(&self) -> bool {
        self.get_all(header::TRANSFER_ENCODING)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .any(|v| v.trim().eq_ignore_ascii_case("chunked"))
    }
}
