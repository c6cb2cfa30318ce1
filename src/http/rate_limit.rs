//! Rate-limit header parsing
//!
//! Reads the `X-RateLimit-*` family and `Retry-After` so callers can see why
//! a request was refused. No client-side throttling happens here.

use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::HeaderMap;
use std::time::Duration;

const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RESET_HEADER: &str = "x-ratelimit-reset";
const RETRY_AFTER_HEADER: &str = "retry-after";

/// Rate-limit window reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    /// Requests allowed per window
    pub limit: Option<u32>,
    /// Requests left in the current window
    pub remaining: u32,
    /// When the window resets
    pub reset: Option<DateTime<Utc>>,
}

impl RateLimit {
    /// Read rate-limit headers; `None` when the server sent no remaining count
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let remaining = header_u64(headers, REMAINING_HEADER)?;
        Some(Self {
            limit: header_u64(headers, LIMIT_HEADER).map(|v| v.min(u32::MAX as u64) as u32),
            remaining: remaining.min(u32::MAX as u64) as u32,
            reset: header_u64(headers, RESET_HEADER)
                .and_then(|secs| Utc.timestamp_opt(secs as i64, 0).single()),
        })
    }

    /// No requests left in this window
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Time until the window resets, measured from `now`
    pub fn reset_in(&self, now: DateTime<Utc>) -> Option<Duration> {
        let reset = self.reset?;
        (reset - now).to_std().ok()
    }
}

/// Parse `Retry-After` as delta-seconds or an HTTP date
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get(RETRY_AFTER_HEADER)?.to_str().ok()?.trim();
    if let Ok(secs) = raw.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    let at = DateTime::parse_from_rfc2822(raw).ok()?.with_timezone(&Utc);
    (at - Utc::now()).to_std().ok()
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
mod rate_limit_tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn test_rate_limit_from_headers() {
        let map = headers(&[
            ("x-ratelimit-limit", "5000"),
            ("x-ratelimit-remaining", "4999"),
            ("x-ratelimit-reset", "1700000000"),
        ]);

        let rate = RateLimit::from_headers(&map).unwrap();
        assert_eq!(rate.limit, Some(5000));
        assert_eq!(rate.remaining, 4999);
        assert_eq!(rate.reset.unwrap().timestamp(), 1_700_000_000);
        assert!(!rate.is_exhausted());
    }

    #[test]
    fn test_rate_limit_missing_remaining() {
        let map = headers(&[("x-ratelimit-limit", "60")]);
        assert!(RateLimit::from_headers(&map).is_none());
    }

    #[test]
    fn test_rate_limit_exhausted() {
        let map = headers(&[("x-ratelimit-remaining", "0")]);
        let rate = RateLimit::from_headers(&map).unwrap();
        assert!(rate.is_exhausted());
        assert!(rate.limit.is_none());
        assert!(rate.reset.is_none());
    }

    #[test]
    fn test_reset_in() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let rate = RateLimit {
            limit: None,
            remaining: 0,
            reset: Some(Utc.timestamp_opt(1_700_000_090, 0).unwrap()),
        };
        assert_eq!(rate.reset_in(now), Some(Duration::from_secs(90)));

        let later = Utc.timestamp_opt(1_700_000_100, 0).unwrap();
        assert_eq!(rate.reset_in(later), None);
    }

    #[test]
    fn test_retry_after_seconds() {
        let map = headers(&[("retry-after", "30")]);
        assert_eq!(parse_retry_after(&map), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_retry_after_garbage() {
        let map = headers(&[("retry-after", "soon")]);
        assert_eq!(parse_retry_after(&map), None);
        assert_eq!(parse_retry_after(&HeaderMap::new()), None);
    }
}
