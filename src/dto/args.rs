use super::FieldType;
use crate::error::ArgError;
use crate::value::Value;
use std::collections::VecDeque;

/// Positional constructor arguments, resolved in declared parameter order.
///
/// Each call to [`Args::next`] consumes the next argument and converts it to
/// the requested Rust type. A value of the wrong type is a constructor argument
/// mismatch, reported as [`ArgError`].
#[derive(Debug)]
pub struct Args {
    type_name: &'static str,
    values: VecDeque<(String, Value)>,
}

impl Args {
    pub fn new(type_name: &'static str, values: Vec<(String, Value)>) -> Self {
        Args {
            type_name,
            values: values.into(),
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    /// Next argument as raw [`Value`] together with its parameter name.
    pub fn next_value(&mut self) -> Result<(String, Value), ArgError> {
        self.values.pop_front().ok_or_else(|| ArgError::Exhausted {
            type_name: self.type_name.to_string(),
        })
    }

    /// Next argument converted to `T`.
    #[allow(clippy::should_implement_trait)]
    pub fn next<T: FieldType>(&mut self) -> Result<T, ArgError> {
        let (parameter, value) = self.next_value()?;
        T::from_value(value).map_err(|actual| ArgError::Mismatch {
            type_name: self.type_name.to_string(),
            parameter,
            expected: T::expected(),
            actual: actual.shape(),
        })
    }
}
