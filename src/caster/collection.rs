use super::{cast_failed, CastContext, Caster, EnumCaster, NestedObjectCaster};
use crate::descriptor::TypeDescriptor;
use crate::error::{BuildError, BuildResult};
use crate::types::TypeTag;
use crate::value::Value;
use tracing::debug;

/// Sequences with a known element type, cast element by element.
///
/// Each element is resolved through the registry like a parameter of the
/// element type, so bound types and the scan order apply. Without a match,
/// map elements of an object type are still built recursively and enum
/// elements still go through backing value resolution; anything else passes
/// through raw.
///
/// Elements keep the declared element shape: `Vec<Option<Uuid>>` accepts null
/// elements and `Vec<Vec<i64>>` casts the inner items too. The first failing
/// element aborts the whole collection.
#[derive(Debug, Default, Clone, Copy)]
pub struct CollectionCaster;

impl CollectionCaster {
    pub const ID: &'static str = "collection";
}

impl Caster for CollectionCaster {
    fn id(&self) -> &str {
        Self::ID
    }

    fn supports(&self, descriptor: &TypeDescriptor) -> bool {
        matches!(descriptor.declared_type(), TypeTag::List) && descriptor.element_type().is_some()
    }

    fn cast(&self, value: Value, descriptor: &TypeDescriptor, ctx: &CastContext<'_>) -> BuildResult<Value> {
        let Some(element) = descriptor.element() else {
            return Err(BuildError::UnsupportedCastTarget {
                caster: Self::ID.to_string(),
                target: descriptor.declared_type().name().to_string(),
                reason: format!("no element type known for `{}`", descriptor.name()),
            });
        };

        let items = match value {
            Value::List(items) => items,
            Value::Null if descriptor.is_nullable() => return Ok(Value::Null),
            other => {
                return Err(cast_failed(
                    &format!("array<{element}>"),
                    &other,
                    "expected a sequence",
                ))
            }
        };

        ctx.config().check_items(descriptor.name(), items.len())?;
        debug!(
            parameter = descriptor.name(),
            element = %element,
            len = items.len(),
            depth = ctx.depth(),
            "Casting collection"
        );

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let element = TypeDescriptor::for_element(
                    descriptor.owner(),
                    format!("{}[{index}]", descriptor.name()),
                    element,
                );
                cast_element(item, &element, ctx)
            })
            .collect::<BuildResult<Vec<_>>>()
            .map(Value::List)
    }
}

fn cast_element(item: Value, descriptor: &TypeDescriptor, ctx: &CastContext<'_>) -> BuildResult<Value> {
    if let Some(caster) = ctx.builder().registry().resolve(descriptor)? {
        return caster.cast(item, descriptor, ctx);
    }
    match (descriptor.declared_type(), &item) {
        (TypeTag::Object(_), Value::Map(_)) => NestedObjectCaster.cast(item, descriptor, ctx),
        (TypeTag::Enum(_), _) => EnumCaster.cast(item, descriptor, ctx),
        _ => Ok(item),
    }
}
