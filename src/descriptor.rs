//! # Descriptor Module
//!
//! [`TypeDescriptor`] is the read-only view of one constructor parameter that
//! casters and the registry work against. Descriptors are derived once per
//! target type by [`crate::MetadataCache`] and never mutated afterwards.

use crate::types::{ElementType, TypeTag};
use crate::value::Value;

/// Resolved metadata for one constructor parameter.
///
/// `element_type` is only ever set on collection (`TypeTag::List`) parameters.
/// An element annotation naming a type the cache did not know yet is kept as
/// [`TypeDescriptor::element_annotation`] and settled on use.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    owner: &'static str,
    name: String,
    declared: TypeTag,
    nullable: bool,
    default: Option<Value>,
    element: Option<ElementType>,
    annotation: Option<String>,
    explicit_caster: Option<String>,
}

impl TypeDescriptor {
    /// Required, non-nullable parameter `name` of type `owner`.
    pub fn new(owner: &'static str, name: impl Into<String>, declared: TypeTag) -> Self {
        TypeDescriptor {
            owner,
            name: name.into(),
            declared,
            nullable: false,
            default: None,
            element: None,
            annotation: None,
            explicit_caster: None,
        }
    }

    /// Descriptor for one element of a collection parameter. Carries the
    /// element's nullability and, for nested collections, its element type.
    pub fn for_element(owner: &'static str, name: impl Into<String>, element: &ElementType) -> Self {
        TypeDescriptor::new(owner, name, *element.tag())
            .with_nullable(element.is_nullable())
            .with_element_type(element.element().cloned())
    }

    #[must_use]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: Option<Value>) -> Self {
        self.default = default;
        self
    }

    /// Set the element type. Ignored unless the declared type is a collection.
    #[must_use]
    pub fn with_element(self, element: Option<TypeTag>) -> Self {
        self.with_element_type(element.map(ElementType::new))
    }

    /// Like [`TypeDescriptor::with_element`], with element nullability and nesting.
    #[must_use]
    pub fn with_element_type(mut self, element: Option<ElementType>) -> Self {
        if self.declared == TypeTag::List {
            self.element = element;
        }
        self
    }

    /// Record an element annotation whose type name is not resolvable yet.
    #[must_use]
    pub fn with_element_annotation(mut self, annotation: Option<String>) -> Self {
        if self.declared == TypeTag::List {
            self.annotation = annotation;
        }
        self
    }

    #[must_use]
    pub fn with_caster(mut self, caster: Option<String>) -> Self {
        self.explicit_caster = caster;
        self
    }

    /// Name of the type declaring this parameter.
    #[inline]
    #[must_use]
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn declared_type(&self) -> &TypeTag {
        &self.declared
    }

    #[inline]
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[inline]
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    #[must_use]
    pub fn element_type(&self) -> Option<&TypeTag> {
        self.element.as_ref().map(ElementType::tag)
    }

    #[must_use]
    pub fn element(&self) -> Option<&ElementType> {
        self.element.as_ref()
    }

    /// Element type name from an annotation, still unresolved.
    #[must_use]
    pub fn element_annotation(&self) -> Option<&str> {
        self.annotation.as_deref()
    }

    #[must_use]
    pub fn explicit_caster(&self) -> Option<&str> {
        self.explicit_caster.as_deref()
    }
}
