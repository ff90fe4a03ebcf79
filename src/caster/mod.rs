//! # Caster Module
//!
//! Coercion strategies from raw input to a parameter's declared type.
//!
//! ## Overview
//!
//! A [`Caster`] answers two questions about a [`TypeDescriptor`]:
//!
//! - [`Caster::supports`] - can I handle this declared type? Pure and cheap; the
//!   registry calls it speculatively while scanning.
//! - [`Caster::cast`] - convert this raw value. Already-typed input is returned
//!   unchanged, so casting is idempotent.
//!
//! ## Built-in Casters
//!
//! | Caster | Id | Declared types |
//! |---|---|---|
//! | [`ScalarCaster`] | `scalar` | string, int, float, bool, mixed |
//! | [`DateTimeCaster`] | `datetime` | `DateTime` |
//! | [`UuidCaster`] | `uuid` | `Uuid` |
//! | [`EnumCaster`] | `enum` | backed enums |
//! | [`NestedObjectCaster`] | `object` | constructible object types |
//! | [`CollectionCaster`] | `collection` | collections with a known element type |
//!
//! Nested objects and collections recurse into the [`ObjectBuilder`] through
//! the [`CastContext`] handed to every cast, so explicit overrides, bound types
//! and every built-in caster apply at any depth.
//!
//! ## Failures
//!
//! Incompatible input fails with [`crate::CastError`] carrying the target type
//! name, the input's shape ([`Value::shape`]) and a reason.

mod collection;
mod datetime;
mod enumeration;
mod identifier;
mod object;
mod scalar;

pub use collection::CollectionCaster;
pub use datetime::DateTimeCaster;
pub use enumeration::EnumCaster;
pub use identifier::UuidCaster;
pub use object::NestedObjectCaster;
pub use scalar::ScalarCaster;

use crate::builder::ObjectBuilder;
use crate::descriptor::TypeDescriptor;
use crate::error::{BuildError, BuildResult, CastError};
use crate::runtime_config::RuntimeConfig;
use crate::types::ObjectRef;
use crate::value::{Instance, Map, Value};

/// A coercion strategy for one family of declared types.
pub trait Caster: Send + Sync {
    /// Stable identifier, referenced by explicit overrides.
    fn id(&self) -> &str;

    /// Whether this caster handles the descriptor's declared type.
    fn supports(&self, descriptor: &TypeDescriptor) -> bool;

    /// Convert `value` to the descriptor's declared type.
    fn cast(&self, value: Value, descriptor: &TypeDescriptor, ctx: &CastContext<'_>) -> BuildResult<Value>;
}

/// Construction state visible to a caster: the builder (for recursion) and the
/// current nesting depth.
#[derive(Clone, Copy)]
pub struct CastContext<'a> {
    builder: &'a ObjectBuilder,
    depth: usize,
}

impl<'a> CastContext<'a> {
    pub(crate) fn new(builder: &'a ObjectBuilder, depth: usize) -> Self {
        CastContext { builder, depth }
    }

    #[must_use]
    pub fn builder(&self) -> &'a ObjectBuilder {
        self.builder
    }

    /// Nesting depth; the root object is built at depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub fn config(&self) -> &'a RuntimeConfig {
        self.builder.config()
    }

    /// Recursively construct `target` from a nested input map, one level
    /// deeper than the current object.
    pub fn build_nested(&self, target: &ObjectRef, input: Map) -> BuildResult<Instance> {
        self.builder.build_at(target, input, self.depth + 1)
    }
}

/// Shorthand for a [`BuildError::CastFailed`].
pub(crate) fn cast_failed(target: &str, value: &Value, reason: impl Into<String>) -> BuildError {
    CastError::new(target, value.shape(), reason).into()
}
