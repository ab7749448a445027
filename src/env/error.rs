use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

use super::value::FieldKind;

/// Errors raised while resolving or assigning a field.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EnvError {
    #[error("{variable}{}", describe(.description))]
    MissingVariable {
        variable: String,
        description: Option<String>,
    },

    #[error("{variable} variable has an unexpected value")]
    NotAllowed { variable: String },

    #[error(transparent)]
    Cast(#[from] CastError),

    #[error("no field named {0} is declared")]
    UnknownField(String),

    #[error("{variable} resolved to {found:?}, which does not read as {expected}")]
    TypeMismatch {
        variable: String,
        expected: &'static str,
        found: FieldKind,
    },
}

impl EnvError {
    /// Name of the variable the error refers to.
    pub fn variable(&self) -> Option<&str> {
        match self {
            Self::MissingVariable { variable, .. }
            | Self::NotAllowed { variable }
            | Self::TypeMismatch { variable, .. } => Some(variable.as_str()),
            Self::UnknownField(name) => Some(name.as_str()),
            Self::Cast(_) => None,
        }
    }
}

fn describe(description: &Option<String>) -> String {
    match description {
        Some(text) => {
            // Blank lines are kept as they are, line endings included.
            let indented: String = text
                .split_inclusive('\n')
                .map(|line| {
                    if line.trim().is_empty() {
                        line.to_string()
                    } else {
                        format!("        {line}")
                    }
                })
                .collect();
            format!("\n\n{indented}")
        }
        None => String::new(),
    }
}

/// Conversion failures reported by the casters.
///
/// The message always names the offending literal, so these propagate to
/// callers untranslated.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum CastError {
    #[error("invalid literal for integer: '{literal}': {source}")]
    Integer {
        literal: String,
        source: ParseIntError,
    },

    #[error("could not convert string to float: '{literal}': {source}")]
    Float {
        literal: String,
        source: ParseFloatError,
    },

    #[error("'{0}' is not a valid boolean representation")]
    Boolean(String),

    #[error("'{0}' is not a valid ternary representation")]
    Ternary(String),

    #[error("cannot cast a {found:?} value to {expected:?}")]
    Mismatch {
        expected: FieldKind,
        found: FieldKind,
    },
}

/// Errors in the declaration of a namespace, detected when its schema is built.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeclarationError {
    #[error("field {0} is declared more than once")]
    Duplicate(String),

    #[error("field at position {0} has an empty name")]
    EmptyName(usize),

    #[error("allowed value for {variable} is not a valid {kind:?}: {source}")]
    AllowedValue {
        variable: String,
        kind: FieldKind,
        source: CastError,
    },
}
