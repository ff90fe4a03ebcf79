use crate::annotation;
use crate::descriptor::TypeDescriptor;
use crate::dto::{Args, FieldType, ParamSpec, Shape};
use crate::error::{BuildError, BuildResult, ConstructResult};
use crate::types::{ElementType, ObjectRef, TypeTag};
use crate::value::{Instance, Value};
use anyhow::anyhow;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug)]
enum Constructor {
    Declared {
        params: Vec<TypeDescriptor>,
        construct: fn(&mut Args) -> ConstructResult<Instance>,
    },
    Missing,
    Abstract,
}

/// Cached description of one target type: its ordered parameter descriptors
/// and the handle used to instantiate it.
#[derive(Debug)]
pub struct TypeMetadata {
    type_id: TypeId,
    name: &'static str,
    constructor: Constructor,
}

impl TypeMetadata {
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Ordered parameter descriptors. Empty when the type has no constructor.
    #[must_use]
    pub fn parameters(&self) -> &[TypeDescriptor] {
        match &self.constructor {
            Constructor::Declared { params, .. } => params,
            Constructor::Missing | Constructor::Abstract => &[],
        }
    }

    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&TypeDescriptor> {
        self.parameters().iter().find(|p| p.name() == name)
    }

    #[must_use]
    pub fn has_constructor(&self) -> bool {
        matches!(self.constructor, Constructor::Declared { .. })
    }

    #[must_use]
    pub fn is_abstract(&self) -> bool {
        matches!(self.constructor, Constructor::Abstract)
    }

    /// Fail unless this type can actually be instantiated.
    pub fn ensure_constructible(&self) -> BuildResult<()> {
        match self.constructor {
            Constructor::Declared { .. } => Ok(()),
            Constructor::Missing => Err(BuildError::NoConstructor {
                type_name: self.name.to_string(),
            }),
            Constructor::Abstract => Err(BuildError::TypeNotConstructible {
                type_name: self.name.to_string(),
                reason: "abstract types cannot be instantiated".to_string(),
            }),
        }
    }

    /// Call the constructor with arguments in declared order.
    ///
    /// Constructor errors, argument type mismatches and constructor panics are
    /// all reported as [`BuildError::InstantiationFailed`].
    pub fn instantiate(&self, args: Vec<(String, Value)>) -> BuildResult<Instance> {
        self.ensure_constructible()?;
        let Constructor::Declared { construct, .. } = &self.constructor else {
            return Err(BuildError::NoConstructor {
                type_name: self.name.to_string(),
            });
        };

        let mut args = Args::new(self.name, args);
        match panic::catch_unwind(AssertUnwindSafe(|| construct(&mut args))) {
            Ok(Ok(instance)) => Ok(instance),
            Ok(Err(err)) => Err(BuildError::instantiation(self.name, err)),
            Err(payload) => Err(BuildError::instantiation(
                self.name,
                anyhow!("constructor panicked: {}", panic_message(payload.as_ref())),
            )),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

fn builtin(name: &str) -> Option<TypeTag> {
    Some(match name {
        "string" => TypeTag::String,
        "int" | "integer" => TypeTag::Int,
        "float" | "double" => TypeTag::Float,
        "bool" | "boolean" => TypeTag::Bool,
        "mixed" => TypeTag::Mixed,
        "array" => TypeTag::List,
        "DateTime" | "DateTimeImmutable" | "DateTimeInterface" => TypeTag::DateTime,
        "Uuid" | "UuidInterface" => TypeTag::Uuid,
        _ => return None,
    })
}

/// Thread-safe, process-lifetime cache of [`TypeMetadata`] per target type.
#[derive(Debug, Default)]
pub struct MetadataCache {
    entries: DashMap<TypeId, Arc<TypeMetadata>>,
    catalog: DashMap<String, TypeTag>,
}

impl MetadataCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `T` resolvable by name in element annotations and
    /// [`MetadataCache::parameters_of_named`].
    ///
    /// Returns `false` for primitive types, which are always known, and when
    /// the short name already belongs to a different type. The first
    /// registration of a name wins.
    pub fn register<T: FieldType>(&self) -> bool {
        self.register_tag(T::type_tag())
    }

    pub fn register_tag(&self, tag: TypeTag) -> bool {
        if !matches!(tag, TypeTag::Object(_) | TypeTag::Enum(_)) {
            return false;
        }
        let name = annotation::short_name(tag.name()).to_string();
        match self.catalog.entry(name) {
            Entry::Occupied(existing) if existing.get().type_id() != tag.type_id() => {
                warn!(
                    type_name = %existing.key(),
                    "Type name already registered for a different type, keeping the first"
                );
                false
            }
            Entry::Occupied(_) => true,
            Entry::Vacant(slot) => {
                slot.insert(tag);
                true
            }
        }
    }

    /// Resolve a (possibly namespace-qualified) type name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<TypeTag> {
        let short = annotation::short_name(name);
        builtin(short).or_else(|| self.catalog.get(short).map(|entry| *entry.value()))
    }

    /// Ordered parameter descriptors of `target`, described on first use.
    ///
    /// Repeated calls return the same `Arc`.
    pub fn parameters_of(&self, target: &ObjectRef) -> Arc<TypeMetadata> {
        let id = target.id();
        if let Some(hit) = self.entries.get(&id) {
            debug!(type_name = target.name(), "Type metadata cache hit");
            return Arc::clone(hit.value());
        }

        // Describe outside any shard lock; a racing thread may do the same work.
        let described = Arc::new(self.describe(target));
        let cached = Arc::clone(
            self.entries
                .entry(id)
                .or_insert_with(|| Arc::clone(&described))
                .value(),
        );

        if Arc::ptr_eq(&cached, &described) {
            info!(
                type_name = target.name(),
                parameter_count = cached.parameters().len(),
                cache_size = self.entries.len(),
                "Type metadata described and cached"
            );
        } else {
            debug!(
                type_name = target.name(),
                "Type metadata described by another thread"
            );
        }
        cached
    }

    /// Class reference registered under `name`.
    pub fn object_ref(&self, name: &str) -> BuildResult<ObjectRef> {
        match self.lookup(name) {
            Some(TypeTag::Object(target)) => Ok(target),
            Some(other) => Err(BuildError::TypeNotConstructible {
                type_name: name.to_string(),
                reason: format!("`{}` is not an object type", other.name()),
            }),
            None => Err(BuildError::TypeNotConstructible {
                type_name: name.to_string(),
                reason: "type is not registered".to_string(),
            }),
        }
    }

    /// Like [`MetadataCache::parameters_of`], for a type known only by name.
    pub fn parameters_of_named(&self, name: &str) -> BuildResult<Arc<TypeMetadata>> {
        self.object_ref(name).map(|target| self.parameters_of(&target))
    }

    /// Settle an element annotation that named an unknown type when
    /// `descriptor` was described.
    ///
    /// The annotation wins once its type is known. Until then the declared
    /// element type is used; without one the collection cannot be cast and
    /// the annotated type is reported as not constructible. Parameters with an
    /// explicit caster are left to that caster.
    pub fn resolve_element<'a>(&self, descriptor: &'a TypeDescriptor) -> BuildResult<Cow<'a, TypeDescriptor>> {
        let Some(name) = descriptor.element_annotation() else {
            return Ok(Cow::Borrowed(descriptor));
        };
        if descriptor.explicit_caster().is_some() {
            return Ok(Cow::Borrowed(descriptor));
        }

        match self.lookup(name) {
            Some(tag) => {
                debug!(
                    type_name = descriptor.owner(),
                    parameter = descriptor.name(),
                    element = tag.name(),
                    "Element annotation resolved on use"
                );
                Ok(Cow::Owned(
                    descriptor
                        .clone()
                        .with_element_type(Some(ElementType::new(tag)))
                        .with_element_annotation(None),
                ))
            }
            None if descriptor.element().is_some() => Ok(Cow::Borrowed(descriptor)),
            None => Err(BuildError::TypeNotConstructible {
                type_name: name.to_string(),
                reason: format!(
                    "element type of `{}::{}` is not registered",
                    descriptor.owner(),
                    descriptor.name()
                ),
            }),
        }
    }

    /// Instantiate `target` from arguments in declared order.
    pub fn instantiate(&self, target: &ObjectRef, args: Vec<(String, Value)>) -> BuildResult<Instance> {
        self.parameters_of(target).instantiate(args)
    }

    /// Number of described types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every described type. Registered catalog names are kept.
    pub fn clear(&self) {
        let dropped = self.entries.len();
        self.entries.clear();
        info!(dropped = dropped, "Type metadata cache cleared");
    }

    fn describe(&self, target: &ObjectRef) -> TypeMetadata {
        self.register_tag(TypeTag::Object(*target));

        let constructor = if target.is_abstract() {
            Constructor::Abstract
        } else {
            match target.shape() {
                Shape::NoConstructor => Constructor::Missing,
                Shape::Constructor(specs) => Constructor::Declared {
                    params: specs
                        .into_iter()
                        .map(|spec| self.descriptor(target, spec))
                        .collect(),
                    construct: target.construct_fn(),
                },
            }
        };

        TypeMetadata {
            type_id: target.id(),
            name: target.name(),
            constructor,
        }
    }

    fn descriptor(&self, target: &ObjectRef, spec: ParamSpec) -> TypeDescriptor {
        self.register_tag(spec.tag);
        let mut level = spec.element.as_ref();
        while let Some(element) = level {
            self.register_tag(*element.tag());
            level = element.element();
        }

        let (element, pending) = if spec.tag == TypeTag::List {
            self.element_of(target, &spec)
        } else {
            (None, None)
        };

        TypeDescriptor::new(target.name(), spec.name, spec.tag)
            .with_nullable(spec.nullable)
            .with_default(spec.default)
            .with_element_type(element)
            .with_element_annotation(pending)
            .with_caster(spec.caster)
    }

    /// Element type of a collection parameter. An annotation (on the parameter,
    /// else in the type's doc block) wins over the Rust element type. An
    /// annotation naming a type not known yet is returned as pending, to be
    /// settled by [`MetadataCache::resolve_element`].
    fn element_of(&self, target: &ObjectRef, spec: &ParamSpec) -> (Option<ElementType>, Option<String>) {
        let annotated = spec
            .doc
            .as_deref()
            .and_then(annotation::element_type)
            .or_else(|| {
                target
                    .doc()
                    .and_then(|doc| annotation::element_type_for(doc, &spec.name))
            });

        let Some(name) = annotated else {
            return (spec.element.clone(), None);
        };
        match self.lookup(name) {
            Some(tag) => (Some(ElementType::new(tag)), None),
            None => {
                warn!(
                    type_name = target.name(),
                    parameter = %spec.name,
                    element = name,
                    "Element type in annotation not known yet, resolving on use"
                );
                (spec.element.clone(), Some(name.to_string()))
            }
        }
    }
}
