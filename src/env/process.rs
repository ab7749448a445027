use super::source::Source;

/// The live process environment.
///
/// Variables whose value is not valid UTF-8 read as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Source for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        if !is_valid_key(key) {
            return None;
        }
        std::env::var(key).ok()
    }

    fn insert(&mut self, key: String, value: String) {
        if !is_valid_key(&key) || value.contains('\0') {
            tracing::warn!("Refusing to export invalid environment entry {:?}", key);
            return;
        }
        std::env::set_var(key, value);
    }

    fn remove(&mut self, key: &str) -> Option<String> {
        let previous = self.get(key);
        if previous.is_some() {
            std::env::remove_var(key);
        }
        previous
    }
}

/// `std::env::set_var` panics on these.
fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && !key.contains('=') && !key.contains('\0')
}
