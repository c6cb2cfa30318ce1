//! Common types used throughout pagestream

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Ordered key-value map with string keys and values
pub type StringMap = BTreeMap<String, String>;

/// Default accept token sent with every request
pub const DEFAULT_ACCEPT: &str = "application/json";

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method
///
/// Only `GET` is issued by the streaming core; the other verbs exist so a
/// descriptor built for a mutating call is rejected instead of silently sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
}

impl Method {
    /// Whether this method is safe to issue from a read-only stream
    pub fn is_read_only(self) -> bool {
        matches!(self, Self::GET)
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
            Method::PATCH => reqwest::Method::PATCH,
            Method::DELETE => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        reqwest::Method::from(*self).fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_default_is_get() {
        assert_eq!(Method::default(), Method::GET);
        assert!(Method::GET.is_read_only());
        assert!(!Method::POST.is_read_only());
    }

    #[test]
    fn test_method_serde() {
        let method: Method = serde_json::from_str("\"PATCH\"").unwrap();
        assert_eq!(method, Method::PATCH);
        assert_eq!(serde_json::to_string(&Method::GET).unwrap(), "\"GET\"");
        assert_eq!(Method::DELETE.to_string(), "DELETE");
    }
}
