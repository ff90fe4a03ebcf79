//! # Value Module
//!
//! [`Value`] is the one dynamic value flowing through the construction engine.
//! Raw input (strings, numbers, booleans, null, maps, sequences) arrives as the
//! first seven variants; casters produce the typed variants (`DateTime`, `Uuid`,
//! `Enum`, `Object`). Casting an already-typed value returns it unchanged.

use crate::dto::{BackedEnum, Dto};
use crate::types::{Backing, EnumRef};
use chrono::{DateTime, FixedOffset, SecondsFormat};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Flat input map handed over by the transport layer.
pub type Map = HashMap<String, Value>;

/// Longest string rendered verbatim in a shape description.
const SHAPE_STRING_LIMIT: usize = 48;
/// Most map keys listed in a shape description.
const SHAPE_KEY_LIMIT: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(Map),
    DateTime(DateTime<FixedOffset>),
    Uuid(Uuid),
    Enum(EnumValue),
    Object(Instance),
}

impl Value {
    /// Short lowercase kind name (`"string"`, `"map"`, ...).
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::DateTime(_) => "datetime",
            Value::Uuid(_) => "uuid",
            Value::Enum(_) => "enum",
            Value::Object(_) => "object",
        }
    }

    /// Debug-level description of this value's shape, used in cast failures.
    ///
    /// Long strings are truncated and maps list at most a handful of keys so a
    /// hostile payload cannot blow up an error message.
    #[must_use]
    pub fn shape(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => format!("bool({b})"),
            Value::Int(i) => format!("int({i})"),
            Value::Float(f) => format!("float({f})"),
            Value::String(s) if s.chars().count() > SHAPE_STRING_LIMIT => {
                let head: String = s.chars().take(SHAPE_STRING_LIMIT).collect();
                format!("string({head:?}... {} chars)", s.chars().count())
            }
            Value::String(s) => format!("string({s:?})"),
            Value::List(items) => format!("list[{}]", items.len()),
            Value::Map(map) => {
                let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
                keys.sort_unstable();
                let more = keys.len().saturating_sub(SHAPE_KEY_LIMIT);
                keys.truncate(SHAPE_KEY_LIMIT);
                if more > 0 {
                    format!("map{{{}, +{more}}}", keys.join(", "))
                } else {
                    format!("map{{{}}}", keys.join(", "))
                }
            }
            Value::DateTime(dt) => format!("datetime({})", dt.to_rfc3339()),
            Value::Uuid(id) => format!("uuid({id})"),
            Value::Enum(e) => format!("enum({}::{})", e.enum_name, e.name),
            Value::Object(inst) => format!("object({})", inst.type_name()),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// JSON rendition for "mixed" parameters.
    ///
    /// Typed values degrade to their wire form (RFC 3339, hyphenated UUID,
    /// backing value). Constructed objects have no JSON form and yield `None`.
    #[must_use]
    pub fn to_json(&self) -> Option<serde_json::Value> {
        use serde_json::Value as Json;
        Some(match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f).map_or(Json::Null, Json::Number),
            Value::String(s) => Json::String(s.clone()),
            Value::List(items) => Json::Array(
                items
                    .iter()
                    .map(Value::to_json)
                    .collect::<Option<Vec<_>>>()?,
            ),
            Value::Map(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| v.to_json().map(|v| (k.clone(), v)))
                    .collect::<Option<serde_json::Map<_, _>>>()?,
            ),
            Value::DateTime(dt) => Json::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)),
            Value::Uuid(id) => Json::String(id.to_string()),
            Value::Enum(e) => match e.backing {
                Some(Backing::Str(s)) => Json::String(s.to_string()),
                Some(Backing::Int(i)) => Json::from(i),
                None => Json::String(e.name.to_string()),
            },
            Value::Object(_) => return None,
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.shape())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

/// A member of a [`BackedEnum`], erased to its position in the member table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub type_id: TypeId,
    pub enum_name: &'static str,
    pub index: usize,
    pub name: &'static str,
    pub backing: Option<Backing>,
}

impl EnumValue {
    /// Member at `index` of the referenced enum, if it exists.
    #[must_use]
    pub fn from_ref(enum_ref: &EnumRef, index: usize) -> Option<Self> {
        enum_ref.cases().get(index).map(|case| EnumValue {
            type_id: enum_ref.id(),
            enum_name: enum_ref.name(),
            index,
            name: case.name,
            backing: case.backing,
        })
    }

    #[must_use]
    pub fn of<T: BackedEnum>(member: &T) -> Option<Self> {
        Self::from_ref(&EnumRef::of::<T>(), member.index())
    }
}

/// A constructed, immutable target object with its concrete type erased.
///
/// Cloning shares the object. Equality is identity: two instances are equal
/// only when they are the same allocation.
#[derive(Clone)]
pub struct Instance {
    type_id: TypeId,
    type_name: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Instance {
    #[must_use]
    pub fn new<T: Dto>(value: T) -> Self {
        Instance {
            type_id: TypeId::of::<T>(),
            type_name: T::NAME,
            inner: Arc::new(value),
        }
    }

    #[inline]
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Take the concrete object out, cloning only if it is still shared.
    pub fn downcast<T: Dto>(self) -> Result<T, Instance> {
        let Instance {
            type_id,
            type_name,
            inner,
        } = self;
        match inner.downcast::<T>() {
            Ok(typed) => Ok(Arc::try_unwrap(typed).unwrap_or_else(|shared| (*shared).clone())),
            Err(inner) => Err(Instance {
                type_id,
                type_name,
                inner,
            }),
        }
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}
