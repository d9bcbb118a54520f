use crate::errors::{DomainError, DomainResult, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;

/// A trait that DTOs implement for validation before persistence.
pub trait Validate {
    /// Validates the value and returns the first failure, if any.
    fn validate(&self) -> DomainResult<()>;
}

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

/// Struct for configuring validations in a fluent style
#[derive(Default)]
pub struct ValidationBuilder<T> {
    field_name: String,
    value: Option<T>,
    errors: Vec<ValidationError>,
}

impl<T> ValidationBuilder<T> {
    pub fn new(field_name: &str, value: Option<T>) -> Self {
        Self {
            field_name: field_name.to_string(),
            value,
            errors: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self
    where
        T: Default + PartialEq,
    {
        if self.value.is_none() || self.value == Some(T::default()) {
            self.errors.push(ValidationError::required(&self.field_name));
        }
        self
    }

    /// Complete validation, returning the first error for simplicity.
    pub fn validate(self) -> DomainResult<()> {
        match self.errors.into_iter().next() {
            None => Ok(()),
            Some(err) => Err(DomainError::Validation(err)),
        }
    }
}

/// String-specific validations
impl ValidationBuilder<String> {
    pub fn min_length(mut self, min: usize) -> Self {
        if let Some(value) = &self.value {
            if value.len() < min {
                self.errors.push(ValidationError::min_length(&self.field_name, min));
            }
        }
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        if let Some(value) = &self.value {
            if value.len() > max {
                self.errors.push(ValidationError::max_length(&self.field_name, max));
            }
        }
        self
    }

    pub fn email(mut self) -> Self {
        if let Some(value) = &self.value {
            if !value.is_empty() && !EMAIL_REGEX.is_match(value) {
                self.errors.push(ValidationError::format(
                    &self.field_name,
                    "Invalid email address",
                ));
            }
        }
        self
    }

    pub fn one_of(mut self, allowed: &[&str], message: Option<&str>) -> Self {
        if let Some(value) = &self.value {
            if !allowed.contains(&value.as_str()) {
                let reason = message.unwrap_or("Value is not in the allowed set");
                self.errors
                    .push(ValidationError::invalid_value(&self.field_name, reason));
            }
        }
        self
    }
}
