//! # Input Module
//!
//! Flattens what the transport layer extracted from a request into the single
//! input [`Map`] the builder consumes.
//!
//! ## Precedence
//!
//! Sources are merged path < query < body: a query parameter overrides a path
//! parameter of the same name, and a body field overrides both. A JSON body
//! that is not an object (an array, a bare string) lands under the key `body`.
//!
//! Path and query values stay strings; the scalar caster turns `"3"` into `3`
//! when the target parameter is numeric.
//!
//! ## Usage
//!
//! ```rust
//! use brrtdto::input::RequestInput;
//! use brrtdto::Value;
//! use serde_json::json;
//!
//! let input = RequestInput::from_uri("/orders/42?limit=10")
//!     .path_param("id", "42")
//!     .with_body(json!({"limit": 20}))
//!     .into_map();
//!
//! assert_eq!(input.get("id"), Some(&Value::from("42")));
//! assert_eq!(input.get("limit"), Some(&Value::Int(20)));
//! ```

use crate::value::{Map, Value};
use std::collections::HashMap;

/// Key holding a body that is not a JSON object.
pub const BODY_KEY: &str = "body";

/// Request parts feeding one construction.
#[derive(Debug, Clone, Default)]
pub struct RequestInput {
    /// Path parameters extracted by the router
    pub path_params: HashMap<String, String>,
    /// Decoded query string parameters
    pub query_params: HashMap<String, String>,
    /// Decoded JSON body, if any
    pub body: Option<serde_json::Value>,
}

impl RequestInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Input seeded with the query parameters of `uri` (path plus query).
    #[must_use]
    pub fn from_uri(uri: &str) -> Self {
        RequestInput {
            query_params: parse_query(uri),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Merge all sources into one input map.
    #[must_use]
    pub fn into_map(self) -> Map {
        let mut map: Map = self
            .path_params
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        map.extend(
            self.query_params
                .into_iter()
                .map(|(k, v)| (k, Value::String(v))),
        );

        match self.body.map(Value::from) {
            Some(Value::Map(fields)) => map.extend(fields),
            Some(Value::Null) | None => {}
            Some(other) => {
                map.insert(BODY_KEY.to_string(), other);
            }
        }
        map
    }
}

impl From<RequestInput> for Map {
    fn from(input: RequestInput) -> Self {
        input.into_map()
    }
}

/// Decode the query string of `uri`. Accepts a full path (`/x?a=1`), a bare
/// query with or without the leading `?`, and returns the last value for a
/// repeated key.
#[must_use]
pub fn parse_query(uri: &str) -> HashMap<String, String> {
    let query = match uri.find('?') {
        Some(pos) => &uri[pos + 1..],
        None if uri.contains('=') => uri,
        None => return HashMap::new(),
    };
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_query_forms() {
        let q = parse_query("/pets?limit=10&name=fido%20jr");
        assert_eq!(q.get("limit").map(String::as_str), Some("10"));
        assert_eq!(q.get("name").map(String::as_str), Some("fido jr"));
        assert_eq!(parse_query("?a=1").get("a").map(String::as_str), Some("1"));
        assert_eq!(parse_query("a=1").get("a").map(String::as_str), Some("1"));
        assert!(parse_query("/pets").is_empty());
    }

    #[test]
    fn test_precedence_path_query_body() {
        let map = RequestInput::new()
            .path_param("id", "path")
            .query_param("id", "query")
            .query_param("q", "query")
            .with_body(json!({"q": "body"}))
            .into_map();
        assert_eq!(map.get("id"), Some(&Value::from("query")));
        assert_eq!(map.get("q"), Some(&Value::from("body")));
    }

    #[test]
    fn test_non_object_body_under_body_key() {
        let map = RequestInput::new().with_body(json!([1, 2])).into_map();
        assert_eq!(
            map.get(BODY_KEY),
            Some(&Value::List(vec![Value::Int(1), Value::Int(2)]))
        );
        let empty = RequestInput::new().with_body(json!(null)).into_map();
        assert!(empty.is_empty());
    }
}
