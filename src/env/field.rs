//! Field declarations.
//!
//! A field is declared unbound, through [`Required`] or [`Optional`], and
//! receives its name once, when the owning [`Schema`](super::Schema) is built.

use super::error::{CastError, EnvError};
use super::value::{FieldKind, FieldValue};

/// Resolution contract of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Fails when the source has no entry. The description is attached to
    /// the missing-variable error.
    Required { description: Option<String> },
    /// Falls back to `default`, which is cast like any source value.
    Optional { default: FieldValue },
}

/// A declared, named field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    kind: FieldKind,
    mode: Mode,
    allowed: Option<Vec<FieldValue>>,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_required(&self) -> bool {
        matches!(self.mode, Mode::Required { .. })
    }

    pub fn allowed(&self) -> Option<&[FieldValue]> {
        self.allowed.as_deref()
    }

    pub(crate) fn bind(&mut self, name: String) {
        self.name = name;
    }

    /// Casts allowed values to the field's element kind.
    pub(crate) fn normalize_allowed(&mut self) -> Result<(), CastError> {
        let element = self.kind.element();
        if let Some(allowed) = self.allowed.take() {
            let normalized = allowed
                .into_iter()
                .map(|value| element.cast(value))
                .collect::<Result<Vec<_>, _>>()?;
            self.allowed = Some(normalized);
        }
        Ok(())
    }

    /// Casts `value` and checks it against the allowed values.
    pub(crate) fn accept(&self, value: FieldValue) -> Result<FieldValue, EnvError> {
        let value = self.kind.cast(value)?;
        if let Some(allowed) = &self.allowed {
            if !value.is_allowed(allowed) {
                return Err(EnvError::NotAllowed {
                    variable: self.name.clone(),
                });
            }
        }
        Ok(value)
    }

    /// Error for a required field with nothing to resolve from.
    pub(crate) fn missing(&self) -> EnvError {
        let description = match &self.mode {
            Mode::Required { description } => description.clone(),
            Mode::Optional { .. } => None,
        };
        EnvError::MissingVariable {
            variable: self.name.clone(),
            description,
        }
    }
}

/// An ordered sequence of allowed values.
///
/// Implemented for arrays, vectors and slices only; unordered collections
/// are rejected at compile time.
///
/// ```
/// use named_env::required_string;
///
/// let _ = required_string().allowed(["dev", "prod"]);
/// let _ = required_string().allowed(vec!["dev", "prod"]);
/// ```
///
/// ```compile_fail
/// use std::collections::HashSet;
/// use named_env::required_string;
///
/// let _ = required_string().allowed(HashSet::from(["dev", "prod"]));
/// ```
pub trait AllowedValues {
    fn into_values(self) -> Vec<FieldValue>;
}

impl<V: Into<FieldValue>, const N: usize> AllowedValues for [V; N] {
    fn into_values(self) -> Vec<FieldValue> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<V: Into<FieldValue>> AllowedValues for Vec<V> {
    fn into_values(self) -> Vec<FieldValue> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<V: Into<FieldValue> + Clone> AllowedValues for &[V] {
    fn into_values(self) -> Vec<FieldValue> {
        self.iter().cloned().map(Into::into).collect()
    }
}

/// Builder for a required field.
#[derive(Debug, Clone)]
#[must_use = "a field does nothing until it is added to a schema"]
pub struct Required {
    kind: FieldKind,
    description: Option<String>,
    allowed: Option<Vec<FieldValue>>,
}

impl Required {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            description: None,
            allowed: None,
        }
    }

    /// Text shown to the user when the variable is missing.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Restricts resolved values to `values`.
    ///
    /// Values for list fields are the allowed elements.
    pub fn allowed(mut self, values: impl AllowedValues) -> Self {
        self.allowed = Some(values.into_values());
        self
    }
}

impl From<Required> for Field {
    fn from(required: Required) -> Self {
        Field {
            name: String::new(),
            kind: required.kind,
            mode: Mode::Required {
                description: required.description,
            },
            allowed: required.allowed,
        }
    }
}

/// Builder for an optional field.
#[derive(Debug, Clone)]
#[must_use = "a field does nothing until it is added to a schema"]
pub struct Optional {
    kind: FieldKind,
    default: FieldValue,
    allowed: Option<Vec<FieldValue>>,
}

impl Optional {
    pub fn new(kind: FieldKind, default: impl Into<FieldValue>) -> Self {
        Self {
            kind,
            default: default.into(),
            allowed: None,
        }
    }

    /// Restricts resolved values, the default included, to `values`.
    pub fn allowed(mut self, values: impl AllowedValues) -> Self {
        self.allowed = Some(values.into_values());
        self
    }
}

impl From<Optional> for Field {
    fn from(optional: Optional) -> Self {
        Field {
            name: String::new(),
            kind: optional.kind,
            mode: Mode::Optional {
                default: optional.default,
            },
            allowed: optional.allowed,
        }
    }
}

pub fn required_string() -> Required {
    Required::new(FieldKind::String)
}

pub fn required_integer() -> Required {
    Required::new(FieldKind::Integer)
}

pub fn required_float() -> Required {
    Required::new(FieldKind::Float)
}

pub fn required_boolean() -> Required {
    Required::new(FieldKind::Boolean)
}

pub fn required_ternary() -> Required {
    Required::new(FieldKind::Ternary)
}

pub fn required_list() -> Required {
    Required::new(FieldKind::List)
}

pub fn required_path() -> Required {
    Required::new(FieldKind::Path)
}

pub fn required_path_list() -> Required {
    Required::new(FieldKind::PathList)
}

pub fn optional_string(default: impl Into<FieldValue>) -> Optional {
    Optional::new(FieldKind::String, default)
}

pub fn optional_integer(default: impl Into<FieldValue>) -> Optional {
    Optional::new(FieldKind::Integer, default)
}

pub fn optional_float(default: impl Into<FieldValue>) -> Optional {
    Optional::new(FieldKind::Float, default)
}

pub fn optional_boolean(default: impl Into<FieldValue>) -> Optional {
    Optional::new(FieldKind::Boolean, default)
}

pub fn optional_ternary(default: impl Into<FieldValue>) -> Optional {
    Optional::new(FieldKind::Ternary, default)
}

pub fn optional_list(default: impl Into<FieldValue>) -> Optional {
    Optional::new(FieldKind::List, default)
}

pub fn optional_path(default: impl Into<FieldValue>) -> Optional {
    Optional::new(FieldKind::Path, default)
}

pub fn optional_path_list(default: impl Into<FieldValue>) -> Optional {
    Optional::new(FieldKind::PathList, default)
}
