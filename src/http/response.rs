//! Raw responses and the metadata extracted from them

use super::rate_limit::{parse_retry_after, RateLimit};
use crate::pagination::parse_links;
use bytes::Bytes;
use reqwest::header::{HeaderMap, LINK};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

const REQUEST_ID_HEADERS: [&str; 2] = ["x-request-id", "x-github-request-id"];

/// One HTTP response, body fully read
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Body bytes
    pub body: Bytes,
    /// Final URL after redirects
    pub url: Url,
}

impl RawResponse {
    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, lossy
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Extract the response metadata
    pub fn meta(&self) -> ResponseMeta {
        ResponseMeta::from_headers(self.status, &self.headers, &self.url)
    }
}

/// Response metadata a caller may need beyond the items
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMeta {
    /// Status code
    pub status: u16,
    /// Link relations (`next`, `last`, ...) resolved to absolute URLs
    pub links: BTreeMap<String, String>,
    /// Rate-limit window, if reported
    pub rate_limit: Option<RateLimit>,
    /// Retry-After hint, if sent
    pub retry_after: Option<Duration>,
    /// Server request id, if sent
    pub request_id: Option<String>,
}

impl ResponseMeta {
    /// Build metadata from a status and headers; relative links are joined onto `url`
    pub fn from_headers(status: u16, headers: &HeaderMap, url: &Url) -> Self {
        let links = headers
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(|raw| parse_links(raw, Some(url)))
            .unwrap_or_default();

        let request_id = REQUEST_ID_HEADERS
            .iter()
            .find_map(|name| headers.get(*name))
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);

        Self {
            status,
            links,
            rate_limit: RateLimit::from_headers(headers),
            retry_after: parse_retry_after(headers),
            request_id,
        }
    }

    /// The server said no requests are left in this window
    pub fn rate_limit_exhausted(&self) -> bool {
        self.rate_limit.is_some_and(|r| r.is_exhausted())
    }

    /// URL of a Link relation
    pub fn link(&self, rel: &str) -> Option<&str> {
        self.links.get(rel).map(String::as_str)
    }
}
