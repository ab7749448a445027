//! Typed field values.

use std::path::{Path, PathBuf};

/// The semantic type a field is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Boolean,
    Ternary,
    List,
    Path,
    PathList,
}

impl FieldKind {
    /// Kind of a single element, used for allowed-value checks.
    ///
    /// Collections are checked element-wise; scalars are their own element.
    pub fn element(self) -> FieldKind {
        match self {
            Self::List => Self::String,
            Self::PathList => Self::Path,
            other => other,
        }
    }
}

/// A resolved (or assigned) field value.
///
/// `Ternary(None)` is a legitimate resolved value, distinct from a field that
/// has not been resolved yet.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Ternary(Option<bool>),
    List(Vec<String>),
    Path(PathBuf),
    PathList(Vec<PathBuf>),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::String(_) => FieldKind::String,
            Self::Integer(_) => FieldKind::Integer,
            Self::Float(_) => FieldKind::Float,
            Self::Boolean(_) => FieldKind::Boolean,
            Self::Ternary(_) => FieldKind::Ternary,
            Self::List(_) => FieldKind::List,
            Self::Path(_) => FieldKind::Path,
            Self::PathList(_) => FieldKind::PathList,
        }
    }

    /// Checks membership in an allowed set, element-wise for collections.
    pub(crate) fn is_allowed(&self, allowed: &[FieldValue]) -> bool {
        match self {
            Self::List(items) => items.iter().all(|item| {
                allowed
                    .iter()
                    .any(|a| matches!(a, Self::String(s) if s == item))
            }),
            Self::PathList(items) => items.iter().all(|item| {
                allowed
                    .iter()
                    .any(|a| matches!(a, Self::Path(p) if p == item))
            }),
            scalar => allowed.contains(scalar),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Option<bool>> for FieldValue {
    fn from(value: Option<bool>) -> Self {
        Self::Ternary(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(str::to_string).collect())
    }
}

impl From<PathBuf> for FieldValue {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

impl From<&Path> for FieldValue {
    fn from(value: &Path) -> Self {
        Self::Path(value.to_path_buf())
    }
}

impl From<Vec<PathBuf>> for FieldValue {
    fn from(value: Vec<PathBuf>) -> Self {
        Self::PathList(value)
    }
}

/// Rust types a resolved [`FieldValue`] can be read back as.
pub trait FromFieldValue: Sized {
    /// Human-readable name used in type mismatch errors.
    const EXPECTED: &'static str;

    fn from_field_value(value: FieldValue) -> Option<Self>;
}

impl FromFieldValue for FieldValue {
    const EXPECTED: &'static str = "any value";

    fn from_field_value(value: FieldValue) -> Option<Self> {
        Some(value)
    }
}

impl FromFieldValue for String {
    const EXPECTED: &'static str = "string";

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl FromFieldValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Integer(i) => Some(i),
            _ => None,
        }
    }
}

impl FromFieldValue for f64 {
    const EXPECTED: &'static str = "float";

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Float(f) => Some(f),
            _ => None,
        }
    }
}

impl FromFieldValue for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Boolean(b) => Some(b),
            _ => None,
        }
    }
}

impl FromFieldValue for Option<bool> {
    const EXPECTED: &'static str = "ternary";

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Ternary(t) => Some(t),
            _ => None,
        }
    }
}

impl FromFieldValue for Vec<String> {
    const EXPECTED: &'static str = "list";

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl FromFieldValue for PathBuf {
    const EXPECTED: &'static str = "path";

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Path(p) => Some(p),
            _ => None,
        }
    }
}

impl FromFieldValue for Vec<PathBuf> {
    const EXPECTED: &'static str = "path list";

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::PathList(paths) => Some(paths),
            _ => None,
        }
    }
}
