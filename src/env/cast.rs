//! Conversion of raw strings (and native values) into typed field values.

use std::path::PathBuf;

use super::error::CastError;
use super::value::{FieldKind, FieldValue};

const POSITIVE: [&str; 4] = ["y", "yes", "true", "1"];
const NEGATIVE: [&str; 4] = ["n", "no", "false", "0"];
const NONE: [&str; 2] = ["none", ""];

const LIST_SEPARATOR: char = ',';
const PATH_SEPARATOR: char = ':';

impl FieldKind {
    /// Casts a value to this kind.
    ///
    /// Raw text from a source arrives as [`FieldValue::String`]. Values that
    /// already have this kind pass through unchanged, so casting is
    /// idempotent.
    pub fn cast(self, value: FieldValue) -> Result<FieldValue, CastError> {
        match (self, value) {
            (Self::String, FieldValue::String(s)) => Ok(FieldValue::String(s)),
            (Self::String, FieldValue::Integer(i)) => Ok(FieldValue::String(i.to_string())),
            (Self::String, FieldValue::Float(f)) => Ok(FieldValue::String(format!("{f:?}"))),
            (Self::String, FieldValue::Boolean(b)) => Ok(FieldValue::String(b.to_string())),
            (Self::String, FieldValue::Path(p)) => {
                Ok(FieldValue::String(p.to_string_lossy().into_owned()))
            }

            (Self::Integer, FieldValue::String(s)) => parse_integer(&s).map(FieldValue::Integer),
            (Self::Integer, FieldValue::Integer(i)) => Ok(FieldValue::Integer(i)),

            (Self::Float, FieldValue::String(s)) => parse_float(&s).map(FieldValue::Float),
            (Self::Float, FieldValue::Float(f)) => Ok(FieldValue::Float(f)),
            #[allow(clippy::cast_precision_loss)]
            (Self::Float, FieldValue::Integer(i)) => Ok(FieldValue::Float(i as f64)),

            (Self::Boolean, FieldValue::String(s)) => parse_boolean(&s).map(FieldValue::Boolean),
            (Self::Boolean, FieldValue::Boolean(b)) => Ok(FieldValue::Boolean(b)),
            (Self::Boolean, FieldValue::Ternary(Some(b))) => Ok(FieldValue::Boolean(b)),
            (Self::Boolean, FieldValue::Integer(i)) => {
                parse_boolean(&i.to_string()).map(FieldValue::Boolean)
            }

            (Self::Ternary, FieldValue::String(s)) => parse_ternary(&s).map(FieldValue::Ternary),
            (Self::Ternary, FieldValue::Boolean(b)) => Ok(FieldValue::Ternary(Some(b))),
            (Self::Ternary, FieldValue::Ternary(t)) => Ok(FieldValue::Ternary(t)),
            (Self::Ternary, FieldValue::Integer(i)) => {
                parse_ternary(&i.to_string()).map(FieldValue::Ternary)
            }

            (Self::List, FieldValue::String(s)) => Ok(FieldValue::List(
                split(&s, LIST_SEPARATOR).map(str::to_string).collect(),
            )),
            (Self::List, FieldValue::List(items)) => Ok(FieldValue::List(items)),

            (Self::Path, FieldValue::String(s)) => Ok(FieldValue::Path(PathBuf::from(s))),
            (Self::Path, FieldValue::Path(p)) => Ok(FieldValue::Path(p)),

            (Self::PathList, FieldValue::String(s)) => Ok(FieldValue::PathList(
                split(&s, PATH_SEPARATOR).map(PathBuf::from).collect(),
            )),
            (Self::PathList, FieldValue::Path(p)) => Ok(FieldValue::PathList(vec![p])),
            (Self::PathList, FieldValue::List(items)) => Ok(FieldValue::PathList(
                items.into_iter().map(PathBuf::from).collect(),
            )),
            (Self::PathList, FieldValue::PathList(paths)) => Ok(FieldValue::PathList(paths)),

            (expected, other) => Err(CastError::Mismatch {
                expected,
                found: other.kind(),
            }),
        }
    }
}

/// Splits on `separator`, trimming segments and dropping empty ones.
fn split(s: &str, separator: char) -> impl Iterator<Item = &str> {
    s.split(separator).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_integer(s: &str) -> Result<i64, CastError> {
    s.trim().parse().map_err(|source| CastError::Integer {
        literal: s.to_string(),
        source,
    })
}

fn parse_float(s: &str) -> Result<f64, CastError> {
    s.trim().parse().map_err(|source| CastError::Float {
        literal: s.to_string(),
        source,
    })
}

fn parse_boolean(s: &str) -> Result<bool, CastError> {
    let normalized = s.trim().to_lowercase();
    if POSITIVE.contains(&normalized.as_str()) {
        Ok(true)
    } else if NEGATIVE.contains(&normalized.as_str()) {
        Ok(false)
    } else {
        Err(CastError::Boolean(s.to_string()))
    }
}

fn parse_ternary(s: &str) -> Result<Option<bool>, CastError> {
    let normalized = s.trim().to_lowercase();
    if NONE.contains(&normalized.as_str()) {
        return Ok(None);
    }
    parse_boolean(s)
        .map(Some)
        .map_err(|_| CastError::Ternary(s.to_string()))
}
