//! Continuation strategy implementations
//!
//! Each strategy finds the next page URL for a specific API convention.

use crate::http::ResponseMeta;
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// Finds the next page in a response
pub trait Continuation: Send + Sync {
    /// Whether `next_url` needs the parsed response body
    fn needs_body(&self) -> bool {
        false
    }

    /// Absolute URL of the next page, or `None` when this is the last page.
    ///
    /// `body` is `Value::Null` unless `needs_body` returns true.
    fn next_url(&self, body: &JsonValue, meta: &ResponseMeta, page_url: &Url) -> Option<String>;
}

/// Serializable choice of continuation strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContinuationConfig {
    /// Link header (RFC 8288)
    LinkHeader {
        #[serde(default = "default_rel")]
        rel: String,
    },
    /// Next URL in the response body
    NextUrl {
        /// Dot path to the URL, e.g. `pagination.next`
        path: String,
    },
    /// Single page
    None,
}

fn default_rel() -> String {
    "next".to_string()
}

impl Default for ContinuationConfig {
    fn default() -> Self {
        Self::LinkHeader { rel: default_rel() }
    }
}

impl ContinuationConfig {
    /// Build the strategy
    pub fn build(&self) -> Box<dyn Continuation> {
        match self {
            Self::LinkHeader { rel } => Box::new(LinkHeaderContinuation::new(rel.clone())),
            Self::NextUrl { path } => Box::new(NextUrlContinuation::new(path.clone())),
            Self::None => Box::new(SinglePage),
        }
    }
}

// ============================================================================
// Link Header
// ============================================================================

/// Link header continuation (RFC 8288)
///
/// Format: `Link: <https://api.example.com/items?page=2>; rel="next", ...`
#[derive(Debug, Clone)]
pub struct LinkHeaderContinuation {
    /// Rel value to follow
    pub rel: String,
}

impl Default for LinkHeaderContinuation {
    fn default() -> Self {
        Self { rel: default_rel() }
    }
}

impl LinkHeaderContinuation {
    pub fn new(rel: impl Into<String>) -> Self {
        Self { rel: rel.into() }
    }
}

impl Continuation for LinkHeaderContinuation {
    fn next_url(&self, _body: &JsonValue, meta: &ResponseMeta, _page_url: &Url) -> Option<String> {
        meta.link(&self.rel)
            .filter(|url| !url.is_empty())
            .map(ToString::to_string)
    }
}

/// Parse a Link header into a rel → URL map.
///
/// A link with several space-separated rels is recorded under each. When a
/// rel appears twice the first one wins. Relative targets are joined onto
/// `base` when given.
pub fn parse_links(header: &str, base: Option<&Url>) -> BTreeMap<String, String> {
    let mut links = BTreeMap::new();
    let mut rest = header;

    while let Some(start) = rest.find('<') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('>') else {
            break;
        };
        let target = after[..end].trim();
        let tail = &after[end + 1..];
        let params_end = tail.find('<').unwrap_or(tail.len());
        let params = &tail[..params_end];
        rest = &tail[params_end..];

        let resolved = match base {
            Some(base) => match base.join(target) {
                Ok(url) => url.to_string(),
                Err(_) => continue,
            },
            None => target.to_string(),
        };

        for param in params.split(';') {
            let param = param.trim().trim_end_matches(',').trim();
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };
            if !key.trim().eq_ignore_ascii_case("rel") {
                continue;
            }
            let value = value.trim().trim_matches('"').trim_matches('\'');
            for rel in value.split_whitespace() {
                links
                    .entry(rel.to_ascii_lowercase())
                    .or_insert_with(|| resolved.clone());
            }
        }
    }

    links
}

// ============================================================================
// Next URL
// ============================================================================

/// Next URL in the response body
///
/// Common patterns:
/// - `{ "next": "https://api.example.com/items?page=2" }`
/// - `{ "pagination": { "next_url": "/items?page=2" } }`
#[derive(Debug, Clone)]
pub struct NextUrlContinuation {
    /// Dot path to the next URL
    pub path: String,
}

impl NextUrlContinuation {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Continuation for NextUrlContinuation {
    fn needs_body(&self) -> bool {
        true
    }

    fn next_url(&self, body: &JsonValue, _meta: &ResponseMeta, page_url: &Url) -> Option<String> {
        let path = self.path.strip_prefix("$.").unwrap_or(&self.path);
        let mut current = body;
        for part in path.split('.') {
            current = current.as_object()?.get(part)?;
        }

        let raw = current.as_str()?.trim();
        if raw.is_empty() {
            return None;
        }
        page_url.join(raw).ok().map(|url| url.to_string())
    }
}

// ============================================================================
// Single Page
// ============================================================================

/// No continuation - every response is the last page
#[derive(Debug, Clone, Default)]
pub struct SinglePage;

impl Continuation for SinglePage {
    fn next_url(&self, _body: &JsonValue, _meta: &ResponseMeta, _page_url: &Url) -> Option<String> {
        None
    }
}
