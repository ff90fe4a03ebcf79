//! # Runtime Configuration Module
//!
//! Environment variable-based limits for the construction engine.
//!
//! ## Overview
//!
//! Construction is recursive and input-driven, so an untrusted payload decides
//! how deep the builder nests and how many collection elements it casts. Both
//! are unbounded by default; set a limit when the input comes from outside.
//!
//! ## Environment Variables
//!
//! ### `BRRTDTO_MAX_DEPTH`
//!
//! Deepest nesting level at which an object may be built. The root object is
//! depth 0, its nested objects depth 1, and so on. Exceeding it fails with
//! [`BuildError::DepthLimitExceeded`].
//!
//! ### `BRRTDTO_MAX_ITEMS`
//!
//! Largest accepted collection length. Exceeding it fails with
//! [`BuildError::CollectionTooLarge`] before any element is cast.
//!
//! Both accept decimal (`64`) or hexadecimal (`0x40`). Unset, empty or
//! unparseable values mean "no limit".
//!
//! ## Usage
//!
//! ```rust
//! use brrtdto::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("max depth: {:?}", config.max_depth);
//! ```
//!
//! ```bash
//! export BRRTDTO_MAX_DEPTH=16
//! export BRRTDTO_MAX_ITEMS=0x400
//! ```

use crate::error::{BuildError, BuildResult};
use std::env;
use tracing::warn;

/// Construction limits, loaded once at startup with [`RuntimeConfig::from_env`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Deepest nesting level allowed (root is 0), `None` for unbounded
    pub max_depth: Option<usize>,
    /// Largest collection length allowed, `None` for unbounded
    pub max_items: Option<usize>,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        RuntimeConfig {
            max_depth: limit_from_env("BRRTDTO_MAX_DEPTH"),
            max_items: limit_from_env("BRRTDTO_MAX_ITEMS"),
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, limit: usize) -> Self {
        self.max_depth = Some(limit);
        self
    }

    #[must_use]
    pub fn with_max_items(mut self, limit: usize) -> Self {
        self.max_items = Some(limit);
        self
    }

    /// Fail if an object at `depth` would exceed the nesting limit.
    pub fn check_depth(&self, depth: usize) -> BuildResult<()> {
        match self.max_depth {
            Some(limit) if depth > limit => Err(BuildError::DepthLimitExceeded { depth, limit }),
            _ => Ok(()),
        }
    }

    /// Fail if collection `parameter` holds more than the allowed items.
    pub fn check_items(&self, parameter: &str, len: usize) -> BuildResult<()> {
        match self.max_items {
            Some(limit) if len > limit => Err(BuildError::CollectionTooLarge {
                parameter: parameter.to_string(),
                len,
                limit,
            }),
            _ => Ok(()),
        }
    }
}

fn limit_from_env(key: &str) -> Option<usize> {
    let val = env::var(key).ok()?;
    let parsed = parse_limit(&val);
    if parsed.is_none() && !val.trim().is_empty() {
        warn!(key = key, value = %val, "Ignoring unparseable limit");
    }
    parsed
}

fn parse_limit(val: &str) -> Option<usize> {
    let val = val.trim();
    if let Some(hex) = val.strip_prefix("0x") {
        usize::from_str_radix(hex, 16).ok()
    } else {
        val.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit("64"), Some(64));
        assert_eq!(parse_limit("0x40"), Some(64));
        assert_eq!(parse_limit(" 8 "), Some(8));
        assert_eq!(parse_limit("lots"), None);
        assert_eq!(parse_limit(""), None);
    }

    #[test]
    fn test_from_env_reads_limits() {
        // The only test in this binary touching these variables.
        env::set_var("BRRTDTO_MAX_DEPTH", "0x10");
        env::set_var("BRRTDTO_MAX_ITEMS", "not a number");
        let config = RuntimeConfig::from_env();
        let default_builder = crate::ObjectBuilder::default();
        env::remove_var("BRRTDTO_MAX_DEPTH");
        env::remove_var("BRRTDTO_MAX_ITEMS");

        assert_eq!(config.max_depth, Some(16));
        assert_eq!(config.max_items, None);
        assert_eq!(default_builder.config(), &config);
        assert_eq!(RuntimeConfig::from_env(), RuntimeConfig::default());
    }

    #[test]
    fn test_default_is_unbounded() {
        let config = RuntimeConfig::default();
        assert!(config.check_depth(10_000).is_ok());
        assert!(config.check_items("items", usize::MAX).is_ok());
    }

    #[test]
    fn test_limits_are_inclusive() {
        let config = RuntimeConfig::default().with_max_depth(2).with_max_items(3);
        assert!(config.check_depth(2).is_ok());
        assert!(matches!(
            config.check_depth(3),
            Err(BuildError::DepthLimitExceeded { depth: 3, limit: 2 })
        ));
        assert!(config.check_items("items", 3).is_ok());
        assert!(matches!(
            config.check_items("items", 4),
            Err(BuildError::CollectionTooLarge { len: 4, limit: 3, .. })
        ));
    }
}
