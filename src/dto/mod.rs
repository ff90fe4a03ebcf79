//! # DTO Module
//!
//! Compile-time type description for construction targets.
//!
//! ## Overview
//!
//! A target type describes its primary constructor once: an ordered list of
//! [`ParamSpec`]s (name, declared type, nullability, default, overrides). The
//! metadata cache turns that description into [`crate::TypeDescriptor`]s and
//! hands positional arguments back through [`Args`] when instantiating.
//!
//! Most types derive the description:
//!
//! ```rust,ignore
//! use brrtdto::{BackedEnum, Dto};
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
//!     created_at: chrono::DateTime<chrono::FixedOffset>,
//!     status: Status,
//!     #[dto(default)]
//!     note: Option<String>,
//! }
//! ```
//!
//! Hand-written descriptions use the same building blocks:
//!
//! ```rust
//! use brrtdto::{Args, ConstructResult, Dto, ParamSpec, Shape};
//!
//! #[derive(Debug, Clone)]
//! struct Point {
//!     x: f64,
//!     y: f64,
//! }
//!
//! impl Dto for Point {
//!     const NAME: &'static str = "Point";
//!
//!     fn shape() -> Shape {
//!         Shape::constructor(vec![ParamSpec::of::<f64>("x"), ParamSpec::of::<f64>("y")])
//!     }
//!
//!     fn construct(args: &mut Args) -> ConstructResult<Self> {
//!         Ok(Point { x: args.next()?, y: args.next()? })
//!     }
//! }
//! ```

mod args;
mod field;

pub use args::Args;
pub use field::{
    enum_from_value, enum_into_value, enum_tag, object_from_value, object_into_value, object_tag,
    FieldType,
};

use crate::error::ConstructResult;
use crate::types::{ElementType, EnumCase, TypeTag};
use crate::value::Value;

/// A construction target: an immutable value record built from an input map.
pub trait Dto: Clone + Send + Sync + 'static {
    /// Type name used in diagnostics and annotation lookup
    const NAME: &'static str;
    /// Type-level documentation block, searched for `@param array<X> $name`
    const DOC: Option<&'static str> = None;
    /// Abstract targets are described but never instantiated
    const ABSTRACT: bool = false;

    /// Describe the primary constructor.
    fn shape() -> Shape;

    /// Instantiate from positional arguments in declared order.
    fn construct(args: &mut Args) -> ConstructResult<Self>;
}

/// An enumerated type whose members may carry backing values.
pub trait BackedEnum: Copy + Send + Sync + 'static {
    const NAME: &'static str;

    /// Member table, in declaration order.
    fn cases() -> &'static [EnumCase];

    fn from_index(index: usize) -> Option<Self>;

    fn index(&self) -> usize;
}

/// Constructor description of a [`Dto`].
#[derive(Debug, Clone)]
pub enum Shape {
    /// Primary constructor with its ordered parameters (possibly none)
    Constructor(Vec<ParamSpec>),
    /// The type declares no constructor at all
    NoConstructor,
}

impl Shape {
    #[must_use]
    pub fn constructor(params: Vec<ParamSpec>) -> Self {
        Shape::Constructor(params)
    }
}

/// Declaration of one constructor parameter, before caching.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub(crate) name: String,
    pub(crate) tag: TypeTag,
    pub(crate) nullable: bool,
    pub(crate) element: Option<ElementType>,
    pub(crate) default: Option<Value>,
    pub(crate) caster: Option<String>,
    pub(crate) doc: Option<String>,
}

impl ParamSpec {
    /// Parameter with an explicit tag; not nullable, no default.
    pub fn new(name: impl Into<String>, tag: TypeTag) -> Self {
        ParamSpec {
            name: name.into(),
            tag,
            nullable: false,
            element: None,
            default: None,
            caster: None,
            doc: None,
        }
    }

    /// Parameter described by its Rust type: tag, nullability (`Option<T>`) and
    /// element type (`Vec<T>`) come from [`FieldType`].
    pub fn of<T: FieldType>(name: impl Into<String>) -> Self {
        ParamSpec {
            nullable: T::nullable(),
            element: T::element(),
            ..ParamSpec::new(name, T::type_tag())
        }
    }

    #[must_use]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    #[must_use]
    pub fn with_element(self, element: TypeTag) -> Self {
        self.with_element_type(ElementType::new(element))
    }

    /// Element type with its own nullability and nesting.
    #[must_use]
    pub fn with_element_type(mut self, element: ElementType) -> Self {
        self.element = Some(element);
        self
    }

    /// Declare a default value, substituted untouched when the key is absent.
    #[must_use]
    pub fn with_default<T: FieldType>(self, value: T) -> Self {
        self.with_default_value(value.into_value())
    }

    #[must_use]
    pub fn with_default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Bypass auto-resolution and always use the caster registered under `id`.
    #[must_use]
    pub fn with_caster(mut self, id: impl Into<String>) -> Self {
        self.caster = Some(id.into());
        self
    }

    /// Element annotation: `array<X>`, `array<int, X>` or `X[]`.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
