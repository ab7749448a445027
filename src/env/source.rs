use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;

/// A mutable string-to-string mapping fields are resolved from.
///
/// Reads go through [`contains_key`](Source::contains_key) followed by
/// [`get`](Source::get), so implementations may override the former when a
/// cheaper containment check exists.
pub trait Source: Send + Sync + std::fmt::Debug {
    fn get(&self, key: &str) -> Option<String>;

    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn insert(&mut self, key: String, value: String);

    fn remove(&mut self, key: &str) -> Option<String>;
}

impl<S: std::hash::BuildHasher + Send + Sync> Source for HashMap<String, String, S> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }

    fn contains_key(&self, key: &str) -> bool {
        HashMap::contains_key(self, key)
    }

    fn insert(&mut self, key: String, value: String) {
        HashMap::insert(self, key, value);
    }

    fn remove(&mut self, key: &str) -> Option<String> {
        HashMap::remove(self, key)
    }
}

impl Source for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }

    fn contains_key(&self, key: &str) -> bool {
        BTreeMap::contains_key(self, key)
    }

    fn insert(&mut self, key: String, value: String) {
        BTreeMap::insert(self, key, value);
    }

    fn remove(&mut self, key: &str) -> Option<String> {
        BTreeMap::remove(self, key)
    }
}

/// A source shared between a namespace and whoever else holds it.
///
/// Clones point at the same mapping, so mutations made through any handle
/// are visible to every namespace reading from it.
#[derive(Debug, Clone)]
pub struct SharedSource(Arc<RwLock<Box<dyn Source>>>);

impl SharedSource {
    pub fn new(source: impl Source + 'static) -> Self {
        Self(Arc::new(RwLock::new(Box::new(source))))
    }

    /// Builds an in-memory source from key/value pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::new(map)
    }

    /// Looks `key` up: a containment check, then an indexed read.
    pub fn lookup(&self, key: &str) -> Option<String> {
        let source = self.0.read();
        if source.contains_key(key) {
            source.get(key)
        } else {
            None
        }
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.0.write().insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.0.write().remove(key)
    }

    /// Whether both handles point at the same mapping.
    pub fn ptr_eq(&self, other: &SharedSource) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for SharedSource {
    fn default() -> Self {
        Self::new(super::process::ProcessEnv)
    }
}
