//! # Builder Module
//!
//! The construction algorithm: input map in, fully constructed immutable
//! object (or a structured [`crate::BuildError`]) out.
//!
//! ## Algorithm
//!
//! For a target type and an input map:
//!
//! 1. Fetch the ordered parameter descriptors from the [`crate::MetadataCache`].
//!    A type without any constructor fails with `NoConstructor`; zero parameters
//!    is fine.
//! 2. For each parameter, in declared order:
//!    - key present (exact name match): resolve a caster through the
//!      [`crate::CasterRegistry`] and cast, or keep the raw value if none applies
//!    - key absent, default declared: use the default as-is (defaults are never
//!      cast)
//!    - otherwise: fail with `MissingRequiredParameter`, immediately
//! 3. Instantiate with the arguments in declared order. A failing or panicking
//!    constructor is reported as `InstantiationFailed`.
//!
//! Nested objects and collections re-enter step 1 through the casters, one
//! level deeper. Input keys that match no parameter are ignored.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use brrtdto::{CasterRegistry, ObjectBuilder};
//! use serde_json::json;
//!
//! let builder = ObjectBuilder::new(CasterRegistry::with_defaults());
//! let order: Order = builder.build_json(json!({
//!     "id": "550e8400-e29b-41d4-a716-446655440000",
//!     "created_at": "2024-11-25T10:00:00+00:00",
//!     "status": "active"
//! }))?;
//! ```
//!
//! ## Thread Safety
//!
//! `ObjectBuilder` is `Send + Sync` and cheap to clone (registry and cache are
//! shared `Arc`s). Build once at startup, then call `build` from any thread.

mod core;

pub use core::ObjectBuilder;
