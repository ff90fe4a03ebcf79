use super::{cast_failed, CastContext, Caster};
use crate::descriptor::TypeDescriptor;
use crate::error::BuildResult;
use crate::types::TypeTag;
use crate::value::Value;
use uuid::Uuid;

/// Canonical hyphenated text length: 8-4-4-4-12.
const CANONICAL_LEN: usize = 36;

/// Canonical UUID strings to `Uuid`.
///
/// Only the 36-character hyphenated form is accepted. Braced, URN and
/// unhyphenated spellings are rejected so the wire format stays unambiguous.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidCaster;

impl UuidCaster {
    pub const ID: &'static str = "uuid";
}

impl Caster for UuidCaster {
    fn id(&self) -> &str {
        Self::ID
    }

    fn supports(&self, descriptor: &TypeDescriptor) -> bool {
        matches!(descriptor.declared_type(), TypeTag::Uuid)
    }

    fn cast(&self, value: Value, descriptor: &TypeDescriptor, _ctx: &CastContext<'_>) -> BuildResult<Value> {
        let target = descriptor.declared_type().name();
        match value {
            Value::Uuid(_) => Ok(value),
            Value::Null if descriptor.is_nullable() => Ok(Value::Null),
            Value::String(ref s) => parse_canonical(s)
                .map(Value::Uuid)
                .ok_or_else(|| cast_failed(target, &value, "not a canonical UUID string")),
            _ => Err(cast_failed(target, &value, "expected a UUID string")),
        }
    }
}

fn parse_canonical(s: &str) -> Option<Uuid> {
    if s.len() != CANONICAL_LEN {
        return None;
    }
    Uuid::try_parse(s).ok()
}
