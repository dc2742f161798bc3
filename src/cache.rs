//! Cache metadata from response headers.
//!
//! The crate does not cache anything itself. It reads the caching headers of
//! a successful response so that a request framework with a response cache
//! can store the result.

use chrono::DateTime;
use http::header;
use http::HeaderMap;

use crate::ext::HeaderMapExt;

/// Caching information for a response. All times are milliseconds since the
/// unix epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// `ETag` of the response.
    pub etag: Option<String>,
    /// `Date` of the response as sent by the server.
    pub server_date: Option<i64>,
    /// `Last-Modified` of the response.
    pub last_modified: Option<i64>,
    /// Hard expiry. After this the entry must not be used.
    pub ttl: i64,
    /// Soft expiry. After this the entry may be used while it is refreshed.
    pub soft_ttl: i64,
    /// All response headers.
    pub headers: HeaderMap,
}

impl CacheEntry {
    /// Read caching headers.
    ///
    /// Returns `None` if the response must not be cached (`Cache-Control:
    /// no-cache` or `no-store`).
    ///
    /// * `Cache-Control: max-age` sets the soft expiry, `stale-while-revalidate`
    ///   extends the hard expiry past it unless `must-revalidate` or
    ///   `proxy-revalidate` is given.
    /// * Without `Cache-Control`, `Expires - Date` is used.
    pub fn parse(headers: &HeaderMap, now: i64) -> Option<CacheEntry> {
        let server_date = headers.get_str(header::DATE).and_then(parse_date);
        let expires = headers.get_str(header::EXPIRES).and_then(parse_date);
        let last_modified = headers.get_str(header::LAST_MODIFIED).and_then(parse_date);
        let etag = headers.get_str(header::ETAG).map(|s| s.to_string());

        let mut has_cache_control = false;
        let mut max_age: i64 = 0;
        let mut stale_while_revalidate: i64 = 0;
        let mut must_revalidate = false;

        for v in headers.get_all(header::CACHE_CONTROL) {
            let Ok(v) = v.to_str() else {
                continue;
            };
            has_cache_control = true;

            for token in v.split(',').map(|t| t.trim()) {
                if token == "no-cache" || token == "no-store" {
                    return None;
                } else if let Some(n) = token.strip_prefix("max-age=") {
                    max_age = n.parse().unwrap_or(max_age);
                } else if let Some(n) = token.strip_prefix("stale-while-revalidate=") {
                    stale_while_revalidate = n.parse().unwrap_or(stale_while_revalidate);
                } else if token == "must-revalidate" || token == "proxy-revalidate" {
                    must_revalidate = true;
                }
            }
        }

        let (soft_ttl, ttl) = if has_cache_control {
            let soft = now.saturating_add(max_age.saturating_mul(1000));
            let hard = if must_revalidate {
                soft
            } else {
                soft.saturating_add(stale_while_revalidate.saturating_mul(1000))
            };
            (soft, hard)
        } else {
            match (server_date, expires) {
                (Some(date), Some(expires)) if expires >= date => {
                    let soft = now.saturating_add(expires - date);
                    (soft, soft)
                }
                _ => (0, 0),
            }
        };

        Some(CacheEntry {
            etag,
            server_date,
            last_modified,
            ttl,
            soft_ttl,
            headers: headers.clone(),
        })
    }

    /// Tell if the entry is past its hard expiry.
    pub fn is_expired(&self, now: i64) -> bool {
        self.ttl < now
    }

    /// Tell if the entry is past its soft expiry.
    pub fn refresh_needed(&self, now: i64) -> bool {
        self.soft_ttl < now
    }
}

fn parse_date(v: &str) -> Option<i64> {
    DateTime::parse_from_rfc2822(v)
        .ok()
        .map(|d| d.timestamp_millis())
}
