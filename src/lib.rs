//! # brrtdto
//!
//! **brrtdto** turns flat, loosely typed request input (path parameters, query
//! strings, decoded JSON bodies) into fully constructed, immutable, strongly
//! typed Rust objects.
//!
//! ## Overview
//!
//! A transport layer hands over a map of raw values. For a target type, the
//! engine walks the type's constructor parameters in declared order, pulls the
//! matching raw value out of the map, coerces it to the parameter's declared
//! type with a pluggable [`Caster`], and finally calls the constructor.
//! Nested objects and collections of objects are built recursively with the
//! same machinery.
//!
//! ## Architecture
//!
//! - **[`dto`]** - compile-time type description (`#[derive(Dto)]`,
//!   `#[derive(BackedEnum)]`, [`ParamSpec`])
//! - **[`cache`]** - [`MetadataCache`], one description per type for the life of
//!   the process
//! - **[`caster`]** - the built-in coercion strategies
//! - **[`registry`]** - [`CasterRegistry`] and its resolution order
//! - **[`builder`]** - [`ObjectBuilder`], the construction algorithm
//! - **[`mapper`]** - construction plus aggregated validation, mapped to HTTP
//!   status codes
//! - **[`input`]** - merging path, query and body into one input map
//! - **[`runtime_config`]** - optional depth and collection size limits
//!
//! ### Construction Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Builder as ObjectBuilder
//!     participant Cache as MetadataCache
//!     participant Registry as CasterRegistry
//!     participant Caster
//!     participant Ctor as Dto::construct
//!
//!     Caller->>Builder: build::<Order>(input)
//!     Builder->>Cache: parameters_of(Order)
//!     Cache-->>Builder: Arc<TypeMetadata> (cached after first use)
//!
//!     loop each parameter, declared order
//!         alt key present
//!             Builder->>Registry: resolve(descriptor)
//!             Note over Registry: explicit override,<br/>bound type, ordered scan
//!             Registry-->>Builder: Option<Caster>
//!             Builder->>Caster: cast(raw, descriptor)
//!             opt nested object / collection
//!                 Caster->>Builder: build_nested(target, map)
//!             end
//!             Caster-->>Builder: typed Value
//!         else default declared
//!             Builder->>Builder: use default as-is
//!         else
//!             Builder-->>Caller: MissingRequiredParameter
//!         end
//!     end
//!
//!     Builder->>Ctor: construct(args)
//!     Ctor-->>Builder: Order
//!     Builder-->>Caller: Ok(Order)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use brrtdto::{BackedEnum, CasterRegistry, Dto, ObjectBuilder};
//! use serde_json::json;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, BackedEnum)]
//! enum Status {
//!     #[dto(value = "active")]
//!     Active,
//!     #[dto(value = "inactive")]
//!     Inactive,
//! }
//!
//! #[derive(Debug, Clone, Dto)]
//! struct Order {
//!     id: uuid::Uuid,
//!     status: Status,
//!     qty: i64,
//!     #[dto(default)]
//!     note: Option<String>,
//! }
//!
//! let builder = ObjectBuilder::new(CasterRegistry::with_defaults());
//! let order: Order = builder
//!     .build_json(json!({
//!         "id": "550e8400-e29b-41d4-a716-446655440000",
//!         "status": "active",
//!         "qty": "3"
//!     }))
//!     .unwrap();
//!
//! assert_eq!(order.status, Status::Active);
//! assert_eq!(order.qty, 3);
//! assert_eq!(order.note, None);
//! ```
//!
//! ## Error Model
//!
//! Construction is fail-fast and returns a [`BuildError`]; every cast failure
//! carries the target type, the input's shape and a reason ([`CastError`]).
//! Validation runs afterwards and aggregates ([`mapper::ValidationErrors`]).
//!
//! ## Runtime Considerations
//!
//! Everything is synchronous. [`ObjectBuilder`], [`CasterRegistry`] and
//! [`MetadataCache`] are `Send + Sync`: configure the registry at startup, then
//! build from any number of threads. Set `BRRTDTO_MAX_DEPTH` /
//! `BRRTDTO_MAX_ITEMS` (see [`runtime_config`]) when input is untrusted.
//! `ObjectBuilder::default()` and `Mapper::default()` read them; a builder
//! from [`ObjectBuilder::new`] is unbounded until given
//! `.with_config(RuntimeConfig::from_env())`.

// The derive macros emit `::brrtdto::` paths; this makes them resolve inside
// the crate's own tests too.
extern crate self as brrtdto;

pub mod annotation;
pub mod builder;
pub mod cache;
pub mod caster;
pub mod descriptor;
pub mod dto;
pub mod error;
pub mod input;
pub mod mapper;
pub mod registry;
pub mod runtime_config;
pub mod types;
pub mod value;

pub use builder::ObjectBuilder;
pub use cache::{MetadataCache, TypeMetadata};
pub use caster::{CastContext, Caster};
pub use descriptor::TypeDescriptor;
pub use dto::{Args, BackedEnum, Dto, FieldType, ParamSpec, Shape};
pub use error::{ArgError, BuildError, BuildResult, CastError, ConstructResult};
pub use registry::CasterRegistry;
pub use types::{Backing, ElementType, EnumCase, EnumRef, ObjectRef, TypeTag};
pub use value::{EnumValue, Instance, Map, Value};

pub use brrtdto_macros::{BackedEnum, Dto};
