//! # Types Module
//!
//! Type tags describe what a constructor parameter declares. They replace runtime
//! reflection: every [`crate::FieldType`] reports its tag at compile time, and
//! class/enum references carry the function pointers the builder needs to
//! describe and instantiate them.

use crate::dto::{Args, BackedEnum, Dto, FieldType, Shape};
use crate::error::ConstructResult;
use crate::value::Instance;
use chrono::{DateTime, FixedOffset};
use std::any::TypeId;
use std::fmt;
use uuid::Uuid;

/// Declared type of a constructor parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeTag {
    String,
    Int,
    Float,
    Bool,
    /// Accepts anything, passed through untouched
    Mixed,
    DateTime,
    Uuid,
    /// Collection marker; the element type lives on the descriptor
    List,
    Object(ObjectRef),
    Enum(EnumRef),
}

impl TypeTag {
    /// Primitive tags are never bound to a caster explicitly.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            TypeTag::String
                | TypeTag::Int
                | TypeTag::Float
                | TypeTag::Bool
                | TypeTag::Mixed
                | TypeTag::List
        )
    }

    /// Identity used for bound-type lookup. `None` for primitives.
    #[must_use]
    pub fn type_id(&self) -> Option<TypeId> {
        match self {
            TypeTag::DateTime => Some(TypeId::of::<DateTime<FixedOffset>>()),
            TypeTag::Uuid => Some(TypeId::of::<Uuid>()),
            TypeTag::Object(r) => Some(r.id()),
            TypeTag::Enum(r) => Some(r.id()),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::String => "string",
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Bool => "bool",
            TypeTag::Mixed => "mixed",
            TypeTag::DateTime => "DateTime",
            TypeTag::Uuid => "Uuid",
            TypeTag::List => "array",
            TypeTag::Object(r) => r.name(),
            TypeTag::Enum(r) => r.name(),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn construct_instance<T: Dto>(args: &mut Args) -> ConstructResult<Instance> {
    T::construct(args).map(Instance::new)
}

/// Declared element type of a collection: its tag, whether elements may be
/// null, and for nested collections the inner element type.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementType {
    tag: TypeTag,
    nullable: bool,
    element: Option<Box<ElementType>>,
}

impl ElementType {
    /// Non-nullable element of type `tag`.
    #[must_use]
    pub fn new(tag: TypeTag) -> Self {
        ElementType {
            tag,
            nullable: false,
            element: None,
        }
    }

    /// Element described by its Rust type, e.g. `Option<Uuid>` or `Vec<i64>`.
    #[must_use]
    pub fn of<T: FieldType>() -> Self {
        ElementType {
            tag: T::type_tag(),
            nullable: T::nullable(),
            element: T::element().map(Box::new),
        }
    }

    #[must_use]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Inner element type. Ignored unless this element is itself a collection.
    #[must_use]
    pub fn with_element(mut self, element: ElementType) -> Self {
        if self.tag == TypeTag::List {
            self.element = Some(Box::new(element));
        }
        self
    }

    #[inline]
    #[must_use]
    pub fn tag(&self) -> &TypeTag {
        &self.tag
    }

    #[inline]
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub fn element(&self) -> Option<&ElementType> {
        self.element.as_deref()
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            f.write_str("?")?;
        }
        match &self.element {
            Some(inner) => write!(f, "array<{inner}>"),
            None => f.write_str(self.tag.name()),
        }
    }
}

/// Class reference: a constructible (or abstract) [`Dto`] type.
#[derive(Clone, Copy)]
pub struct ObjectRef {
    id: TypeId,
    name: &'static str,
    doc: Option<&'static str>,
    is_abstract: bool,
    shape: fn() -> Shape,
    construct: fn(&mut Args) -> ConstructResult<Instance>,
}

impl ObjectRef {
    #[must_use]
    pub fn of<T: Dto>() -> Self {
        ObjectRef {
            id: TypeId::of::<T>(),
            name: T::NAME,
            doc: T::DOC,
            is_abstract: T::ABSTRACT,
            shape: T::shape,
            construct: construct_instance::<T>,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type-level documentation block (`@param array<X> $name` lines).
    #[must_use]
    pub fn doc(&self) -> Option<&'static str> {
        self.doc
    }

    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Run the type's description. Called once per type by the metadata cache.
    #[must_use]
    pub fn shape(&self) -> Shape {
        (self.shape)()
    }

    pub(crate) fn construct_fn(&self) -> fn(&mut Args) -> ConstructResult<Instance> {
        self.construct
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectRef").field(&self.name).finish()
    }
}

/// Backing value of an enum member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backing {
    Str(&'static str),
    Int(i64),
}

impl fmt::Display for Backing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backing::Str(s) => write!(f, "{s:?}"),
            Backing::Int(i) => write!(f, "{i}"),
        }
    }
}

/// One member of a [`BackedEnum`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumCase {
    pub name: &'static str,
    pub backing: Option<Backing>,
}

impl EnumCase {
    pub const fn new(name: &'static str, backing: Option<Backing>) -> Self {
        EnumCase { name, backing }
    }
}

/// Enum reference: an enumerated type and its member table.
#[derive(Clone, Copy)]
pub struct EnumRef {
    id: TypeId,
    name: &'static str,
    cases: fn() -> &'static [EnumCase],
}

impl EnumRef {
    #[must_use]
    pub fn of<T: BackedEnum>() -> Self {
        EnumRef {
            id: TypeId::of::<T>(),
            name: T::NAME,
            cases: T::cases,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn cases(&self) -> &'static [EnumCase] {
        (self.cases)()
    }

    /// True when every member carries a backing value.
    #[must_use]
    pub fn is_backed(&self) -> bool {
        let cases = self.cases();
        !cases.is_empty() && cases.iter().all(|c| c.backing.is_some())
    }
}

impl PartialEq for EnumRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for EnumRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EnumRef").field(&self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_type_of_nested_rust_types() {
        let ids = ElementType::of::<Option<Uuid>>();
        assert_eq!(ids.tag(), &TypeTag::Uuid);
        assert!(ids.is_nullable());
        assert!(ids.element().is_none());
        assert_eq!(ids.to_string(), "?Uuid");

        let rows = ElementType::of::<Vec<Option<i64>>>();
        assert_eq!(rows.tag(), &TypeTag::List);
        assert_eq!(rows.element(), Some(&ElementType::new(TypeTag::Int).nullable(true)));
        assert_eq!(rows.to_string(), "array<?int>");
    }

    #[test]
    fn test_inner_element_only_on_collections() {
        let scalar = ElementType::new(TypeTag::Int).with_element(ElementType::new(TypeTag::Int));
        assert!(scalar.element().is_none());
    }

    #[test]
    fn test_primitives_have_no_identity() {
        for tag in [
            TypeTag::String,
            TypeTag::Int,
            TypeTag::Float,
            TypeTag::Bool,
            TypeTag::Mixed,
            TypeTag::List,
        ] {
            assert!(tag.is_primitive());
            assert!(tag.type_id().is_none());
        }
    }

    #[test]
    fn test_value_classes_are_not_primitive() {
        assert!(!TypeTag::DateTime.is_primitive());
        assert!(!TypeTag::Uuid.is_primitive());
        assert_eq!(TypeTag::Uuid.type_id(), Some(TypeId::of::<Uuid>()));
    }

    #[test]
    fn test_backing_display() {
        assert_eq!(Backing::Str("active").to_string(), "\"active\"");
        assert_eq!(Backing::Int(3).to_string(), "3");
    }
}
