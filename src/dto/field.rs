use super::{BackedEnum, Dto};
use crate::types::{ElementType, EnumRef, ObjectRef, TypeTag};
use crate::value::{EnumValue, Instance, Value};
use chrono::{DateTime, FixedOffset, Utc};
use std::any::TypeId;
use uuid::Uuid;

/// A Rust type usable as a constructor parameter.
///
/// Reports the declared type tag and converts between the type and [`Value`].
/// `from_value` hands the offending value back on mismatch so the caller can
/// describe it.
pub trait FieldType: Sized + 'static {
    fn type_tag() -> TypeTag;

    fn nullable() -> bool {
        false
    }

    /// Element type for collections, with element nullability and nesting.
    fn element() -> Option<ElementType> {
        None
    }

    /// Tag of [`FieldType::element`].
    fn element_tag() -> Option<TypeTag> {
        Self::element().map(|element| *element.tag())
    }

    /// Human-readable expected type, e.g. `?array<LineItem>`.
    fn expected() -> String {
        Self::type_tag().name().to_string()
    }

    fn from_value(value: Value) -> Result<Self, Value>;

    fn into_value(self) -> Value;
}

impl FieldType for String {
    fn type_tag() -> TypeTag {
        TypeTag::String
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(other),
        }
    }

    fn into_value(self) -> Value {
        Value::String(self)
    }
}

macro_rules! int_field {
    ($($ty:ty),*) => {
        $(
            impl FieldType for $ty {
                fn type_tag() -> TypeTag {
                    TypeTag::Int
                }

                fn from_value(value: Value) -> Result<Self, Value> {
                    match value {
                        Value::Int(i) => <$ty>::try_from(i).map_err(|_| Value::Int(i)),
                        other => Err(other),
                    }
                }

                #[allow(clippy::cast_precision_loss)]
                fn into_value(self) -> Value {
                    i64::try_from(self).map_or(Value::Float(self as f64), Value::Int)
                }
            }
        )*
    };
}

int_field!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FieldType for f64 {
    fn type_tag() -> TypeTag {
        TypeTag::Float
    }

    #[allow(clippy::cast_precision_loss)]
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            other => Err(other),
        }
    }

    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl FieldType for f32 {
    fn type_tag() -> TypeTag {
        TypeTag::Float
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: Value) -> Result<Self, Value> {
        f64::from_value(value).map(|f| f as f32)
    }

    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl FieldType for bool {
    fn type_tag() -> TypeTag {
        TypeTag::Bool
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(other),
        }
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl FieldType for serde_json::Value {
    fn type_tag() -> TypeTag {
        TypeTag::Mixed
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        value.to_json().ok_or(value)
    }

    fn into_value(self) -> Value {
        Value::from(self)
    }
}

impl FieldType for DateTime<FixedOffset> {
    fn type_tag() -> TypeTag {
        TypeTag::DateTime
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::DateTime(dt) => Ok(dt),
            other => Err(other),
        }
    }

    fn into_value(self) -> Value {
        Value::DateTime(self)
    }
}

impl FieldType for DateTime<Utc> {
    fn type_tag() -> TypeTag {
        TypeTag::DateTime
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        DateTime::<FixedOffset>::from_value(value).map(|dt| dt.with_timezone(&Utc))
    }

    fn into_value(self) -> Value {
        Value::DateTime(self.fixed_offset())
    }
}

impl FieldType for Uuid {
    fn type_tag() -> TypeTag {
        TypeTag::Uuid
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Uuid(id) => Ok(id),
            other => Err(other),
        }
    }

    fn into_value(self) -> Value {
        Value::Uuid(self)
    }
}

impl<T: FieldType> FieldType for Option<T> {
    fn type_tag() -> TypeTag {
        T::type_tag()
    }

    fn nullable() -> bool {
        true
    }

    fn element() -> Option<ElementType> {
        T::element()
    }

    fn expected() -> String {
        format!("?{}", T::expected())
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn into_value(self) -> Value {
        self.map_or(Value::Null, T::into_value)
    }
}

impl<T: FieldType> FieldType for Vec<T> {
    fn type_tag() -> TypeTag {
        TypeTag::List
    }

    fn element() -> Option<ElementType> {
        Some(ElementType::of::<T>())
    }

    fn expected() -> String {
        format!("array<{}>", T::expected())
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(other),
        }
    }

    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(T::into_value).collect())
    }
}

/// `FieldType::from_value` for a derived [`Dto`].
pub fn object_from_value<T: Dto>(value: Value) -> Result<T, Value> {
    match value {
        Value::Object(instance) if instance.is::<T>() => instance.downcast::<T>().map_err(Value::Object),
        other => Err(other),
    }
}

/// `FieldType::into_value` for a derived [`Dto`].
pub fn object_into_value<T: Dto>(value: T) -> Value {
    Value::Object(Instance::new(value))
}

/// `FieldType::from_value` for a derived [`BackedEnum`].
pub fn enum_from_value<T: BackedEnum>(value: Value) -> Result<T, Value> {
    match value {
        Value::Enum(member) if member.type_id == TypeId::of::<T>() => {
            T::from_index(member.index).ok_or(Value::Enum(member))
        }
        other => Err(other),
    }
}

/// `FieldType::into_value` for a derived [`BackedEnum`].
pub fn enum_into_value<T: BackedEnum>(value: T) -> Value {
    EnumValue::of(&value).map_or(Value::Null, Value::Enum)
}

/// Type tag of a derived [`Dto`].
#[must_use]
pub fn object_tag<T: Dto>() -> TypeTag {
    TypeTag::Object(ObjectRef::of::<T>())
}

/// Type tag of a derived [`BackedEnum`].
#[must_use]
pub fn enum_tag<T: BackedEnum>() -> TypeTag {
    TypeTag::Enum(EnumRef::of::<T>())
}
