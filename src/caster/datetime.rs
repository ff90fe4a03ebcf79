use super::{cast_failed, CastContext, Caster};
use crate::descriptor::TypeDescriptor;
use crate::error::BuildResult;
use crate::types::TypeTag;
use crate::value::Value;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

/// Zoned ISO-8601 forms accepted besides strict RFC 3339.
const ZONED_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%:z"];
/// Zone-less forms, read as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// ISO-8601 text and Unix timestamps to `DateTime`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateTimeCaster;

impl DateTimeCaster {
    pub const ID: &'static str = "datetime";
}

impl Caster for DateTimeCaster {
    fn id(&self) -> &str {
        Self::ID
    }

    fn supports(&self, descriptor: &TypeDescriptor) -> bool {
        matches!(descriptor.declared_type(), TypeTag::DateTime)
    }

    fn cast(&self, value: Value, descriptor: &TypeDescriptor, _ctx: &CastContext<'_>) -> BuildResult<Value> {
        let target = descriptor.declared_type().name();
        match value {
            Value::DateTime(_) => Ok(value),
            Value::Null if descriptor.is_nullable() => Ok(Value::Null),
            Value::String(ref s) => parse_iso8601(s.trim())
                .map(Value::DateTime)
                .ok_or_else(|| cast_failed(target, &value, "not an ISO-8601 timestamp")),
            Value::Int(secs) => DateTime::<Utc>::from_timestamp(secs, 0)
                .map(|dt| Value::DateTime(dt.fixed_offset()))
                .ok_or_else(|| cast_failed(target, &value, "Unix timestamp out of range")),
            _ => Err(cast_failed(
                target,
                &value,
                "expected an ISO-8601 string or a Unix timestamp",
            )),
        }
    }
}

fn parse_iso8601(s: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    if let Some(dt) = ZONED_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt);
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc().fixed_offset())
}
