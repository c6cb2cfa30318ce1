//! Request descriptor and path-template resolution
//!
//! Templates use `{name}` placeholders, e.g. `/repos/{owner}/{repo}/issues`.
//! Each value is percent-encoded as a single path segment.

use crate::error::StreamError;
use crate::types::{Method, StringMap, DEFAULT_ACCEPT};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use url::Url;

/// Regex for matching path placeholders: {name}
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}").unwrap());

/// Immutable description of a single read request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    /// Path template or absolute URL
    template: String,
    /// Values for `{name}` placeholders
    #[serde(default)]
    path_params: StringMap,
    /// Query parameters
    #[serde(default)]
    query: StringMap,
    /// HTTP method
    #[serde(default)]
    method: Method,
    /// Accept / content negotiation token
    #[serde(default = "default_accept")]
    accept: String,
    /// The template is a finished URL (continuation links); skip placeholder rendering
    #[serde(default)]
    literal: bool,
}

fn default_accept() -> String {
    DEFAULT_ACCEPT.to_string()
}

impl RequestDescriptor {
    /// Create a descriptor with the given method and path template
    pub fn new(method: Method, template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            path_params: StringMap::new(),
            query: StringMap::new(),
            method,
            accept: default_accept(),
            literal: false,
        }
    }

    /// Create a GET descriptor
    pub fn get(template: impl Into<String>) -> Self {
        Self::new(Method::GET, template)
    }

    /// Set a path parameter
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.path_params.insert(name.into(), value.to_string());
        self
    }

    /// Set a query parameter, replacing any previous value
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.insert(key.into(), value.to_string());
        self
    }

    /// Set a query parameter only when a value is present
    #[must_use]
    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    /// Set the accept token
    #[must_use]
    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    /// Derive a descriptor for an absolute continuation URL.
    ///
    /// The URL already carries its own query string; method and accept
    /// token are kept.
    #[must_use]
    pub fn with_url(&self, url: impl Into<String>) -> Self {
        Self {
            template: url.into(),
            path_params: StringMap::new(),
            query: StringMap::new(),
            method: self.method,
            accept: self.accept.clone(),
            literal: true,
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn path_params(&self) -> &StringMap {
        &self.path_params
    }

    pub fn query_params(&self) -> &StringMap {
        &self.query
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn accept_token(&self) -> &str {
        &self.accept
    }

    /// Render the path template, failing on any unbound placeholder
    pub fn render_path(&self) -> Result<String, StreamError> {
        if self.literal {
            return Ok(self.template.clone());
        }

        let mut missing = Vec::new();
        let rendered = PLACEHOLDER_REGEX.replace_all(&self.template, |caps: &regex::Captures| {
            let name = &caps[1];
            match self.path_params.get(name) {
                Some(value) => urlencoding::encode(value).into_owned(),
                None => {
                    missing.push(name.to_string());
                    String::new()
                }
            }
        });

        if missing.is_empty() {
            Ok(rendered.into_owned())
        } else {
            Err(StreamError::malformed_request(format!(
                "missing path parameter(s): {}",
                missing.join(", ")
            ))
            .with_descriptor(self.clone()))
        }
    }

    /// Resolve to a single absolute URL.
    ///
    /// Relative templates are joined onto `base`; the query map is appended
    /// to whatever query the template already carries.
    pub fn resolve(&self, base: Option<&Url>) -> Result<Url, StreamError> {
        if !self.method.is_read_only() {
            return Err(StreamError::malformed_request(format!(
                "{} requests cannot be streamed",
                self.method
            ))
            .with_descriptor(self.clone()));
        }

        let path = self.render_path()?;
        let full = if path.starts_with("http://") || path.starts_with("https://") {
            path
        } else {
            let Some(base) = base else {
                return Err(StreamError::malformed_request(format!(
                    "relative path '{path}' needs a base URL"
                ))
                .with_descriptor(self.clone()));
            };
            let base = base.as_str().trim_end_matches('/');
            let path = path.trim_start_matches('/');
            format!("{base}/{path}")
        };

        let mut url = Url::parse(&full).map_err(|e| {
            StreamError::malformed_request(format!("invalid URL '{full}': {e}"))
                .with_descriptor(self.clone())
        })?;

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }
}

/// Extract all placeholder names from a path template
pub fn extract_placeholders(template: &str) -> Vec<String> {
    PLACEHOLDER_REGEX
        .captures_iter(template)
        .map(|cap| cap[1].to_string())
        .collect()
}
