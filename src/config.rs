//! Client configuration
//!
//! Everything needed to talk to one REST service, loadable from YAML:
//!
//! ```yaml
//! base_url: https://api.example.com
//! timeout: 15
//! auth:
//!   type: bearer
//!   token: ${EXAMPLE_TOKEN}
//! pagination:
//!   page_size: 100
//! ```
//!
//! `${NAME}` placeholders are replaced from the process environment before
//! the YAML is parsed. An unset variable is an error.

use crate::auth::AuthConfig;
use crate::decode::DecoderConfig;
use crate::error::{Error, Result, ResultExt};
use crate::http::HttpClientConfig;
use crate::pagination::{ContinuationConfig, PaginationOptions};
use crate::types::{StringMap, DEFAULT_ACCEPT};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

/// Regex for environment placeholders: ${NAME}
static ENV_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

/// Configuration for an [`crate::ApiClient`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL that relative request paths are joined onto
    pub base_url: String,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept token for descriptors created by the client
    #[serde(default = "default_accept")]
    pub accept: String,

    /// Headers added to every request
    #[serde(default)]
    pub default_headers: StringMap,

    /// Authentication
    #[serde(default)]
    pub auth: AuthConfig,

    /// Default pagination options
    #[serde(default)]
    pub pagination: PaginationOptions,

    /// How to find the next page
    #[serde(default)]
    pub continuation: ContinuationConfig,

    /// How to read records out of a response body
    #[serde(default)]
    pub decoder: DecoderConfig,
}

fn default_user_agent() -> String {
    format!("{}/{}", crate::NAME, crate::VERSION)
}

fn default_timeout() -> u64 {
    30
}

fn default_accept() -> String {
    DEFAULT_ACCEPT.to_string()
}

impl ClientConfig {
    /// Create a config with defaults for everything but the base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            user_agent: default_user_agent(),
            timeout: default_timeout(),
            accept: default_accept(),
            default_headers: StringMap::new(),
            auth: AuthConfig::None,
            pagination: PaginationOptions::default(),
            continuation: ContinuationConfig::default(),
            decoder: DecoderConfig::default(),
        }
    }

    /// Create a builder
    pub fn builder(base_url: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::new(base_url),
        }
    }

    /// Parse a YAML document, expanding `${VAR}` from the environment
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::from_yaml_with(yaml, |name| std::env::var(name).ok())
    }

    /// Parse a YAML document, resolving `${VAR}` with `lookup`
    pub fn from_yaml_with(yaml: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let expanded = expand_env(yaml, lookup)?;
        let config: Self = serde_yaml::from_str(&expanded)
            .map_err(|e| Error::config(format!("Failed to parse client YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&yaml)
    }

    /// Check the config
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_value("base_url", format!("'{}': {e}", self.base_url)))?;
        if url.cannot_be_a_base() {
            return Err(Error::invalid_value("base_url", "must be an absolute http(s) URL"));
        }
        if self.timeout == 0 {
            return Err(Error::invalid_value("timeout", "must be greater than 0"));
        }
        if self.accept.is_empty() {
            return Err(Error::invalid_value("accept", "must not be empty"));
        }
        self.pagination.validate()
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Transport settings derived from this config
    pub fn http_config(&self) -> Result<HttpClientConfig> {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(self.timeout())
            .user_agent(&self.user_agent);
        for (key, value) in &self.default_headers {
            builder = builder.header(key, value);
        }
        builder.build()
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set the timeout in seconds
    #[must_use]
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.config.timeout = seconds;
        self
    }

    /// Set the accept token
    #[must_use]
    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.config.accept = accept.into();
        self
    }

    /// Add a default header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set authentication
    #[must_use]
    pub fn auth(mut self, auth: AuthConfig) -> Self {
        self.config.auth = auth;
        self
    }

    /// Set default pagination options
    #[must_use]
    pub fn pagination(mut self, options: PaginationOptions) -> Self {
        self.config.pagination = options;
        self
    }

    /// Set the continuation strategy
    #[must_use]
    pub fn continuation(mut self, continuation: ContinuationConfig) -> Self {
        self.config.continuation = continuation;
        self
    }

    /// Set the record decoder
    #[must_use]
    pub fn decoder(mut self, decoder: DecoderConfig) -> Self {
        self.config.decoder = decoder;
        self
    }

    /// Validate and build
    pub fn build(self) -> Result<ClientConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Replace every `${NAME}` in `text`; all unresolved names are reported together
fn expand_env(text: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
    let mut missing = Vec::new();

    let expanded = ENV_REGEX.replace_all(text, |caps: &regex::Captures<'_>| {
        let name = &caps[1];
        lookup(name).unwrap_or_else(|| {
            missing.push(name.to_string());
            String::new()
        })
    });

    if missing.is_empty() {
        Ok(expanded.into_owned())
    } else {
        Err(Error::undefined_var(missing.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn env(name: &str) -> Option<String> {
        match name {
            "EXAMPLE_TOKEN" => Some("tok_123".to_string()),
            "EXAMPLE_HOST" => Some("api.example.com".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = ClientConfig::from_yaml_with("base_url: https://api.example.com", env).unwrap();

        assert_eq!(config, ClientConfig::new("https://api.example.com"));
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.auth.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
base_url: https://${EXAMPLE_HOST}/v3
user_agent: my-tool/1.0
timeout: 10
accept: application/vnd.github+json
default_headers:
  X-GitHub-Api-Version: "2022-11-28"
auth:
  type: bearer
  token: ${EXAMPLE_TOKEN}
pagination:
  page_size: 100
  max_pages: 5
continuation:
  type: next_url
  path: paging.next
decoder:
  format: json
  record_path: items
"#;

        let config = ClientConfig::from_yaml_with(yaml, env).unwrap();

        assert_eq!(config.base_url, "https://api.example.com/v3");
        assert_eq!(config.user_agent, "my-tool/1.0");
        assert_eq!(config.timeout, 10);
        assert_eq!(config.accept, "application/vnd.github+json");
        assert_eq!(
            config.default_headers.get("X-GitHub-Api-Version").map(String::as_str),
            Some("2022-11-28")
        );
        assert_eq!(config.auth, AuthConfig::bearer("tok_123"));
        assert_eq!(config.pagination.page_size, Some(100));
        assert_eq!(config.pagination.max_pages, Some(5));
        assert_eq!(config.pagination.page_param, "page");
        assert_eq!(
            config.continuation,
            ContinuationConfig::NextUrl {
                path: "paging.next".to_string()
            }
        );
        assert_eq!(config.decoder, DecoderConfig::json_with_path("items"));
    }

    #[test]
    fn test_undefined_variables_are_reported() {
        let yaml = "base_url: https://${NOPE_HOST}\nauth:\n  type: bearer\n  token: ${NOPE_TOKEN}\n";

        let err = ClientConfig::from_yaml_with(yaml, env).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("NOPE_HOST"), "{message}");
        assert!(message.contains("NOPE_TOKEN"), "{message}");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ClientConfig::from_yaml_with("base_url: not a url", env).unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = ClientConfig::builder("https://api.example.com")
            .timeout(0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_invalid_pagination_rejected() {
        let yaml = "base_url: https://api.example.com\npagination:\n  page_size: 0\n";
        assert!(ClientConfig::from_yaml_with(yaml, env).is_err());
    }

    #[test]
    fn test_malformed_yaml() {
        let err = ClientConfig::from_yaml_with("base_url: [unterminated", env).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url: https://api.example.com\ntimeout: 5").unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_missing_file() {
        let err = ClientConfig::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(err.to_string().contains("not/here.yaml"));
    }

    #[test]
    fn test_http_config() {
        let config = ClientConfig::builder("https://api.example.com/v1/")
            .timeout(7)
            .header("X-Trace", "on")
            .build()
            .unwrap();

        let http = config.http_config().unwrap();
        assert_eq!(http.timeout, Duration::from_secs(7));
        assert_eq!(http.base_url.unwrap().as_str(), "https://api.example.com/v1/");
        assert_eq!(http.default_headers.get("X-Trace").map(String::as_str), Some("on"));
        assert!(http.user_agent.starts_with("pagestream/"));
    }

    #[test]
    fn test_text_without_placeholders_is_untouched() {
        let text = "cost: $5 and {braces}";
        assert_eq!(expand_env(text, env).unwrap(), text);
    }
}
