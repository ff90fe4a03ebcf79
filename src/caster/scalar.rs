use super::{CastContext, Caster};
use crate::descriptor::TypeDescriptor;
use crate::error::BuildResult;
use crate::types::TypeTag;
use crate::value::Value;

/// Strings, numbers, booleans and "mixed".
///
/// - string: any scalar becomes its text form
/// - int / float: numeric-looking input becomes a number; anything else passes
///   through unchanged, never silently becoming zero
/// - bool: truthiness (`"0"`, `"false"`, `"off"`, `"no"`, `""`, `0` are false)
/// - mixed: always passes through
///
/// Non-scalar input passes through untouched; the constructor rejects it if
/// the type is wrong.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScalarCaster;

impl ScalarCaster {
    pub const ID: &'static str = "scalar";
}

impl Caster for ScalarCaster {
    fn id(&self) -> &str {
        Self::ID
    }

    fn supports(&self, descriptor: &TypeDescriptor) -> bool {
        matches!(
            descriptor.declared_type(),
            TypeTag::String | TypeTag::Int | TypeTag::Float | TypeTag::Bool | TypeTag::Mixed
        )
    }

    fn cast(&self, value: Value, descriptor: &TypeDescriptor, _ctx: &CastContext<'_>) -> BuildResult<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        Ok(match descriptor.declared_type() {
            TypeTag::String => to_string(value),
            TypeTag::Int => to_int(value),
            TypeTag::Float => to_float(value),
            TypeTag::Bool => to_bool(value),
            _ => value,
        })
    }
}

fn to_string(value: Value) -> Value {
    match value {
        Value::Bool(b) => Value::String(b.to_string()),
        Value::Int(i) => Value::String(i.to_string()),
        Value::Float(f) => Value::String(f.to_string()),
        other => other,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn integral(f: f64) -> Option<i64> {
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.is_finite() && f.fract() == 0.0 && in_range).then_some(f as i64)
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|f| f.is_finite())
}

fn to_int(value: Value) -> Value {
    match value {
        Value::Float(f) => integral(f).map_or(Value::Float(f), Value::Int),
        Value::String(s) => {
            let trimmed = s.trim();
            match trimmed.parse::<i64>() {
                Ok(i) => Value::Int(i),
                Err(_) => parse_finite(trimmed)
                    .and_then(integral)
                    .map_or(Value::String(s), Value::Int),
            }
        }
        other => other,
    }
}

#[allow(clippy::cast_precision_loss)]
fn to_float(value: Value) -> Value {
    match value {
        Value::Int(i) => Value::Float(i as f64),
        Value::String(s) => parse_finite(s.trim()).map_or(Value::String(s), Value::Float),
        other => other,
    }
}

fn to_bool(value: Value) -> Value {
    match value {
        Value::Int(i) => Value::Bool(i != 0),
        Value::Float(f) => Value::Bool(f != 0.0),
        Value::String(s) => {
            let falsy = matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "" | "0" | "false" | "off" | "no"
            );
            Value::Bool(!falsy)
        }
        Value::List(items) => Value::Bool(!items.is_empty()),
        Value::Map(map) => Value::Bool(!map.is_empty()),
        other => other,
    }
}
