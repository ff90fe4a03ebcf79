//! # Error Module
//!
//! Failure taxonomy for DTO construction.
//!
//! Construction is fail-fast: the first cast failure or missing parameter aborts
//! the current object and every enclosing one. There is no partial instance and
//! no best-effort substitution beyond declared defaults. Validation (a separate,
//! later step) aggregates instead; see [`crate::mapper::ValidationErrors`].

use thiserror::Error;

/// Result alias used throughout the construction engine.
pub type BuildResult<T> = Result<T, BuildError>;

/// Result returned by target constructors ([`crate::Dto::construct`]).
pub type ConstructResult<T> = anyhow::Result<T>;

/// A raw value could not be coerced to a target type.
///
/// Every caster reports the same triple so failures are diagnosable without a
/// debugger: the target type, the actual input's shape and a reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot cast {actual} to {target}: {reason}")]
pub struct CastError {
    /// Name of the type the caster was producing (e.g. `Status`, `DateTime`)
    pub target: String,
    /// Debug-level shape of the input (see [`crate::Value::shape`])
    pub actual: String,
    /// Human-readable reason
    pub reason: String,
}

impl CastError {
    pub fn new(
        target: impl Into<String>,
        actual: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CastError {
            target: target.into(),
            actual: actual.into(),
            reason: reason.into(),
        }
    }
}

/// A constructor argument did not have the type the constructor asked for.
///
/// Raised by [`crate::Args`] while a target constructor pulls its arguments;
/// the builder reports it wrapped in [`BuildError::InstantiationFailed`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgError {
    #[error("argument `{parameter}` of {type_name}: expected {expected}, got {actual}")]
    Mismatch {
        type_name: String,
        parameter: String,
        expected: String,
        actual: String,
    },
    #[error("{type_name} requested more arguments than it declares")]
    Exhausted { type_name: String },
}

/// Construction failure returned by [`crate::ObjectBuilder`] and every caster.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The type is unknown to the metadata cache or can never be instantiated.
    #[error("type `{type_name}` is not constructible: {reason}")]
    TypeNotConstructible { type_name: String, reason: String },

    /// The type declares no constructor at all (distinct from zero parameters).
    #[error("type `{type_name}` has no constructor")]
    NoConstructor { type_name: String },

    /// A parameter without default was absent from the input map.
    #[error("missing required parameter `{parameter}` for {type_name}")]
    MissingRequiredParameter { type_name: String, parameter: String },

    #[error(transparent)]
    CastFailed(#[from] CastError),

    /// The constructor itself failed after all arguments were resolved.
    #[error("failed to instantiate {type_name}: {source}")]
    InstantiationFailed {
        type_name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A caster was asked to handle a type shape it structurally cannot.
    #[error("caster `{caster}` cannot handle {target}: {reason}")]
    UnsupportedCastTarget {
        caster: String,
        target: String,
        reason: String,
    },

    /// An explicit caster override names a caster nobody defined.
    #[error("parameter `{parameter}` names unknown caster `{caster}`")]
    UnknownCaster { parameter: String, caster: String },

    /// Bound-type registration was attempted for a primitive type.
    #[error("cannot bind caster `{caster}` to primitive type {type_name}")]
    PrimitiveBinding { caster: String, type_name: String },

    #[error("nesting depth {depth} exceeds the configured limit of {limit}")]
    DepthLimitExceeded { depth: usize, limit: usize },

    #[error("collection `{parameter}` has {len} items, limit is {limit}")]
    CollectionTooLarge {
        parameter: String,
        len: usize,
        limit: usize,
    },
}

impl BuildError {
    /// The cast failure carried by this error, if it is one.
    #[must_use]
    pub fn as_cast(&self) -> Option<&CastError> {
        match self {
            BuildError::CastFailed(err) => Some(err),
            _ => None,
        }
    }

    pub(crate) fn instantiation(type_name: &str, source: anyhow::Error) -> Self {
        BuildError::InstantiationFailed {
            type_name: type_name.to_string(),
            source: source.into(),
        }
    }
}
