//! # Mapper Module
//!
//! Request-to-DTO mapping: construction first, validation second.
//!
//! ## Overview
//!
//! The two steps fail differently:
//!
//! - **Construction** ([`crate::ObjectBuilder`]) is fail-fast. The first
//!   missing parameter or incompatible value aborts with a [`BuildError`]; the
//!   request is malformed (`400 Bad Request`).
//! - **Validation** ([`Validator`]) runs on a fully constructed object and
//!   aggregates every violation into [`ValidationErrors`]; the request is
//!   well-formed but unacceptable (`422 Unprocessable Entity`).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use brrtdto::mapper::{Mapper, ValidationErrors};
//!
//! let mapper = Mapper::default();
//! let order: Order = mapper.map(input, &|order: &Order| {
//!     let mut errors = ValidationErrors::new();
//!     if order.items.is_empty() {
//!         errors.add("items", "must not be empty");
//!     }
//!     errors.into_result()
//! })?;
//! ```

use crate::builder::ObjectBuilder;
use crate::dto::Dto;
use crate::error::BuildError;
use crate::input::RequestInput;
use crate::value::Map;
use http::StatusCode;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Aggregated validation failures, keyed by field path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` against `path` (`"items[0].qty"`).
    pub fn add(&mut self, path: impl Into<String>, message: impl Into<String>) -> &mut Self {
        self.fields.entry(path.into()).or_default().push(message.into());
        self
    }

    /// Fold in the errors of a nested object under `prefix`.
    pub fn merge_nested(&mut self, prefix: &str, nested: ValidationErrors) -> &mut Self {
        for (path, messages) in nested.fields {
            self.fields
                .entry(format!("{prefix}.{path}"))
                .or_default()
                .extend(messages);
        }
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.fields.get(path).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} invalid field(s)", self.fields.len())?;
        for (path, messages) in &self.fields {
            write!(f, "; {path}: {}", messages.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Business-rule check on a constructed object.
pub trait Validator<T> {
    fn validate(&self, value: &T) -> Result<(), ValidationErrors>;
}

impl<T, F> Validator<T> for F
where
    F: Fn(&T) -> Result<(), ValidationErrors>,
{
    fn validate(&self, value: &T) -> Result<(), ValidationErrors> {
        self(value)
    }
}

/// Accepts every object.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoValidation;

impl<T> Validator<T> for NoValidation {
    fn validate(&self, _value: &T) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

/// Failure of [`Mapper::map`].
#[derive(Debug, Error)]
pub enum MapError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("validation failed: {0}")]
    Invalid(#[from] ValidationErrors),
}

impl MapError {
    /// HTTP status the transport layer should answer with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            MapError::Build(_) => StatusCode::BAD_REQUEST,
            MapError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// JSON error body.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            MapError::Build(err) => serde_json::json!({
                "error": "Invalid request data",
                "message": err.to_string()
            }),
            MapError::Invalid(errors) => serde_json::json!({
                "error": "Validation failed",
                "errors": errors
            }),
        }
    }
}

/// [`ObjectBuilder`] plus validation.
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    builder: ObjectBuilder,
}

impl Mapper {
    #[must_use]
    pub fn new(builder: ObjectBuilder) -> Self {
        Mapper { builder }
    }

    #[must_use]
    pub fn builder(&self) -> &ObjectBuilder {
        &self.builder
    }

    /// Build a `T` from `input`, then validate it.
    pub fn map<T, V>(&self, input: Map, validator: &V) -> Result<T, MapError>
    where
        T: Dto,
        V: Validator<T> + ?Sized,
    {
        let value = self.builder.build::<T>(input).map_err(|err| {
            debug!(type_name = T::NAME, error = %err, "Construction failed");
            MapError::Build(err)
        })?;

        validator.validate(&value).map_err(|errors| {
            warn!(
                type_name = T::NAME,
                invalid_fields = errors.len(),
                "Validation failed"
            );
            MapError::Invalid(errors)
        })?;
        Ok(value)
    }

    /// [`Mapper::map`] over merged request parts.
    pub fn map_request<T, V>(&self, request: RequestInput, validator: &V) -> Result<T, MapError>
    where
        T: Dto,
        V: Validator<T> + ?Sized,
    {
        self.map(request.into_map(), validator)
    }
}
