use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use super::error::EnvError;
use super::field::Mode;
use super::schema::Schema;
use super::source::SharedSource;
use super::value::{FieldValue, FromFieldValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    /// Resolved from the source or from a default.
    Resolved,
    /// Set explicitly through [`Namespace::set_field`].
    Assigned,
}

#[derive(Debug, Clone)]
struct Slot {
    value: FieldValue,
    origin: Origin,
}

/// A set of declared fields resolved lazily against a source.
///
/// Each field is resolved on first read: looked up in the source, cast to
/// its declared kind (falling back to the cast default for optional fields)
/// and checked against its allowed values. The result is kept in a per-field
/// cache slot.
///
/// With caching enabled, later reads return the cached value even if the
/// source changed. With caching disabled, every read resolves again, except
/// for values assigned with [`set_field`](Self::set_field): those stay until
/// the next assignment or an explicit [`invalidate`](Self::invalidate).
///
/// Reads take `&mut self` since they may fill the cache.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use named_env::{optional_integer, required_string, Namespace, Schema, SharedSource};
///
/// let schema = Schema::builder()
///     .field("HOST", required_string())
///     .field("PORT", optional_integer(3000))
///     .build()?;
///
/// let mut env = Namespace::builder(Arc::new(schema))
///     .source(SharedSource::from_pairs([("HOST", "example.com")]))
///     .build();
///
/// let port: i64 = env.get_as("PORT")?;
/// assert_eq!(port, 3000);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Namespace {
    schema: Arc<Schema>,
    source: SharedSource,
    cache_enabled: bool,
    cache: HashMap<String, Slot>,
}

impl Namespace {
    /// Creates a namespace over the process environment, with caching enabled.
    pub fn new(schema: Arc<Schema>) -> Self {
        Self::builder(schema).build()
    }

    pub fn builder(schema: Arc<Schema>) -> NamespaceBuilder {
        NamespaceBuilder {
            schema,
            source: None,
            cache_enabled: true,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn source(&self) -> &SharedSource {
        &self.source
    }

    /// Replaces the source.
    ///
    /// Resolved values are dropped so they are read again from the new
    /// source; assigned values are kept.
    pub fn set_source(&mut self, source: SharedSource) {
        self.source = source;
        self.cache.retain(|_, slot| slot.origin == Origin::Assigned);
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    pub fn set_cache_enabled(&mut self, enabled: bool) {
        self.cache_enabled = enabled;
    }

    /// Reads a field, resolving it if needed.
    pub fn get_field(&mut self, name: &str) -> Result<FieldValue, EnvError> {
        let field = self
            .schema
            .get(name)
            .ok_or_else(|| EnvError::UnknownField(name.to_string()))?;

        if let Some(slot) = self.cache.get(name) {
            if self.cache_enabled || slot.origin == Origin::Assigned {
                trace!("Cache hit for {}", name);
                return Ok(slot.value.clone());
            }
        }

        let resolved = match self.source.lookup(name) {
            Some(raw) => {
                debug!("Resolving {} from source", name);
                field.accept(FieldValue::String(raw))
            }
            None => match field.mode() {
                Mode::Optional { default } => {
                    debug!("{} not set, using default", name);
                    field.accept(default.clone())
                }
                Mode::Required { .. } => Err(field.missing()),
            },
        };

        let value = match resolved {
            Ok(value) => value,
            Err(err) => {
                // A stale resolution must not outlive a failed read.
                if self
                    .cache
                    .get(name)
                    .is_some_and(|slot| slot.origin == Origin::Resolved)
                {
                    self.cache.remove(name);
                }
                return Err(err);
            }
        };

        self.cache.insert(
            name.to_string(),
            Slot {
                value: value.clone(),
                origin: Origin::Resolved,
            },
        );
        Ok(value)
    }

    /// Reads a field as a concrete Rust type.
    pub fn get_as<T: FromFieldValue>(&mut self, name: &str) -> Result<T, EnvError> {
        let value = self.get_field(name)?;
        let found = value.kind();
        T::from_field_value(value).ok_or_else(|| EnvError::TypeMismatch {
            variable: name.to_string(),
            expected: T::EXPECTED,
            found,
        })
    }

    /// Assigns a field without touching the source.
    ///
    /// The value is cast and checked like a resolved one.
    pub fn set_field(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), EnvError> {
        let field = self
            .schema
            .get(name)
            .ok_or_else(|| EnvError::UnknownField(name.to_string()))?;

        let value = field.accept(value.into())?;
        debug!("Assigned {}", name);
        self.cache.insert(
            name.to_string(),
            Slot {
                value,
                origin: Origin::Assigned,
            },
        );
        Ok(())
    }

    /// Whether a value (resolved or assigned) is held for `name`.
    pub fn is_cached(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }

    /// Drops the cached value of one field. Returns whether one was held.
    pub fn invalidate(&mut self, name: &str) -> bool {
        self.cache.remove(name).is_some()
    }

    /// Drops every cached value, assigned ones included.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Resolves every field in declaration order, stopping at the first error.
    pub fn resolve_all(&mut self) -> Result<Vec<(String, FieldValue)>, EnvError> {
        let schema = Arc::clone(&self.schema);
        let mut resolved = Vec::with_capacity(schema.len());
        for field in schema.fields() {
            let value = self.get_field(field.name())?;
            resolved.push((field.name().to_string(), value));
        }
        Ok(resolved)
    }
}

/// Builder for a [`Namespace`].
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct NamespaceBuilder {
    schema: Arc<Schema>,
    source: Option<SharedSource>,
    cache_enabled: bool,
}

impl NamespaceBuilder {
    /// Reads from `source` instead of the process environment.
    pub fn source(mut self, source: SharedSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Enables or disables caching. Enabled by default.
    pub fn cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn build(self) -> Namespace {
        Namespace {
            schema: self.schema,
            source: self.source.unwrap_or_default(),
            cache_enabled: self.cache_enabled,
            cache: HashMap::new(),
        }
    }
}
