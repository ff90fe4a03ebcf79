use super::{cast_failed, CastContext, Caster};
use crate::descriptor::TypeDescriptor;
use crate::error::{BuildError, BuildResult};
use crate::types::{Backing, EnumRef, TypeTag};
use crate::value::{EnumValue, Value};

/// Backing values to enum members.
///
/// Only enums whose every member carries a backing value are supported. A
/// string-backed enum matches string input exactly and integers by their
/// decimal form; an int-backed enum accepts integers and their decimal string
/// form (query parameters arrive as text).
#[derive(Debug, Default, Clone, Copy)]
pub struct EnumCaster;

impl EnumCaster {
    pub const ID: &'static str = "enum";
}

impl Caster for EnumCaster {
    fn id(&self) -> &str {
        Self::ID
    }

    fn supports(&self, descriptor: &TypeDescriptor) -> bool {
        matches!(descriptor.declared_type(), TypeTag::Enum(e) if e.is_backed())
    }

    fn cast(&self, value: Value, descriptor: &TypeDescriptor, _ctx: &CastContext<'_>) -> BuildResult<Value> {
        let target = backed_target(descriptor)?;
        match value {
            Value::Enum(ref member) if member.type_id == target.id() => Ok(value),
            Value::Null if descriptor.is_nullable() => Ok(Value::Null),
            Value::String(_) | Value::Int(_) => match find_member(&target, &value) {
                Some(member) => Ok(Value::Enum(member)),
                None => Err(cast_failed(target.name(), &value, "no matching member")),
            },
            _ => Err(cast_failed(
                target.name(),
                &value,
                "expected a string or integer backing value",
            )),
        }
    }
}

fn backed_target(descriptor: &TypeDescriptor) -> BuildResult<EnumRef> {
    match descriptor.declared_type() {
        TypeTag::Enum(e) if e.is_backed() => Ok(*e),
        TypeTag::Enum(e) => Err(BuildError::UnsupportedCastTarget {
            caster: EnumCaster::ID.to_string(),
            target: e.name().to_string(),
            reason: "enum has no backing values".to_string(),
        }),
        other => Err(BuildError::UnsupportedCastTarget {
            caster: EnumCaster::ID.to_string(),
            target: other.name().to_string(),
            reason: "not an enumerated type".to_string(),
        }),
    }
}

fn find_member(target: &EnumRef, value: &Value) -> Option<EnumValue> {
    let index = target.cases().iter().position(|case| match (case.backing, value) {
        (Some(Backing::Str(b)), Value::String(s)) => b == s,
        (Some(Backing::Str(b)), Value::Int(i)) => b == i.to_string(),
        (Some(Backing::Int(b)), Value::Int(i)) => b == *i,
        (Some(Backing::Int(b)), Value::String(s)) => s.trim().parse::<i64>().is_ok_and(|i| i == b),
        _ => false,
    })?;
    EnumValue::from_ref(target, index)
}
