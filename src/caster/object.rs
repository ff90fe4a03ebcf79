use super::{cast_failed, CastContext, Caster};
use crate::descriptor::TypeDescriptor;
use crate::error::{BuildError, BuildResult};
use crate::types::TypeTag;
use crate::value::Value;

/// Structured maps to nested target objects, built recursively.
///
/// The nested build runs through the same [`crate::ObjectBuilder`] as the root,
/// one level deeper, so the whole registry applies to its parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct NestedObjectCaster;

impl NestedObjectCaster {
    pub const ID: &'static str = "object";
}

impl Caster for NestedObjectCaster {
    fn id(&self) -> &str {
        Self::ID
    }

    fn supports(&self, descriptor: &TypeDescriptor) -> bool {
        matches!(descriptor.declared_type(), TypeTag::Object(target) if !target.is_abstract())
    }

    fn cast(&self, value: Value, descriptor: &TypeDescriptor, ctx: &CastContext<'_>) -> BuildResult<Value> {
        let TypeTag::Object(target) = descriptor.declared_type() else {
            return Err(BuildError::UnsupportedCastTarget {
                caster: Self::ID.to_string(),
                target: descriptor.declared_type().name().to_string(),
                reason: "not an object type".to_string(),
            });
        };

        match value {
            Value::Object(ref instance) if instance.type_id() == target.id() => Ok(value),
            Value::Null if descriptor.is_nullable() => Ok(Value::Null),
            Value::Map(input) => ctx.build_nested(target, input).map(Value::Object),
            _ => Err(cast_failed(target.name(), &value, "expected a structured map")),
        }
    }
}
