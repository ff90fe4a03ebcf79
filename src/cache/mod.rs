//! # Metadata Cache Module
//!
//! Process-lifetime memoization of constructor descriptions.
//!
//! ## Overview
//!
//! Describing a target type (running its [`crate::Dto::shape`], resolving
//! element annotations against the type catalog, building descriptors) happens
//! once per type. Every later request for the same type returns the same
//! `Arc<TypeMetadata>`: callers may rely on pointer identity and on the
//! descriptor sequence never changing.
//!
//! ## Type Catalog
//!
//! Element annotations name types as strings (`array<LineItem>`). The cache keeps
//! a catalog from short type name to [`crate::TypeTag`] so those names can be
//! resolved. Built-in names (`string`, `int`, `DateTime`, `Uuid`, ...) are always
//! known; target types are added on first description, along with every
//! object/enum type their parameters mention. Types only ever named inside an
//! annotation must be registered up front with [`MetadataCache::register`].
//!
//! ## Thread Safety
//!
//! Entries live in a sharded `DashMap` keyed by `TypeId`:
//! - Cache hits take a shard read lock only
//! - A miss describes the type *outside* any lock, then inserts; if another
//!   thread won the race its entry is kept and the local copy is discarded
//! - No caller can ever observe two different descriptor sequences for a type
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! let cache = MetadataCache::new();
//! cache.register::<LineItem>();
//!
//! let first = cache.parameters_of(&ObjectRef::of::<Container>());
//! let second = cache.parameters_of(&ObjectRef::of::<Container>());
//! assert!(Arc::ptr_eq(&first, &second));
//! ```

mod core;

pub use core::{MetadataCache, TypeMetadata};
