//! Deserialization of resolved fields into a user struct.

use serde::de::DeserializeOwned;
use toml::{Table, Value};

use super::namespace::Namespace;
use super::value::FieldValue;
use crate::Error;

impl Namespace {
    /// Resolves every field and deserializes the result into `T`.
    ///
    /// Struct fields are matched against the lower-cased field names. A
    /// ternary that resolved to its absent state is left out, so it reads as
    /// `None` in an `Option<bool>`.
    ///
    /// ## Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use named_env::{optional_ternary, required_list, Namespace, Schema, SharedSource};
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Settings {
    ///     hosts: Vec<String>,
    ///     verbose: Option<bool>,
    /// }
    ///
    /// let schema = Schema::builder()
    ///     .field("HOSTS", required_list())
    ///     .field("VERBOSE", optional_ternary("none"))
    ///     .build()?;
    /// let mut env = Namespace::builder(Arc::new(schema))
    ///     .source(SharedSource::from_pairs([("HOSTS", "a, b")]))
    ///     .build();
    ///
    /// let settings: Settings = env.extract()?;
    /// assert_eq!(settings.hosts, ["a", "b"]);
    /// assert_eq!(settings.verbose, None);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn extract<T: DeserializeOwned>(&mut self) -> Result<T, Error> {
        let mut table = Table::new();
        for (name, value) in self.resolve_all()? {
            if let Some(value) = to_toml(value) {
                table.insert(name.to_lowercase(), value);
            }
        }

        Value::Table(table).try_into().map_err(Error::Deserialize)
    }
}

fn to_toml(value: FieldValue) -> Option<Value> {
    let value = match value {
        FieldValue::String(s) => Value::String(s),
        FieldValue::Integer(i) => Value::Integer(i),
        FieldValue::Float(f) => Value::Float(f),
        FieldValue::Boolean(b) | FieldValue::Ternary(Some(b)) => Value::Boolean(b),
        FieldValue::Ternary(None) => return None,
        FieldValue::List(items) => Value::Array(items.into_iter().map(Value::String).collect()),
        FieldValue::Path(path) => Value::String(path.to_string_lossy().into_owned()),
        FieldValue::PathList(paths) => Value::Array(
            paths
                .into_iter()
                .map(|p| Value::String(p.to_string_lossy().into_owned()))
                .collect(),
        ),
    };
    Some(value)
}
