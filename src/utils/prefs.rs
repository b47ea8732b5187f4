//! Injected preference storage
//!
//! UI preferences such as the diagnostics-overlay toggle outlive a player
//! instance. Where they live is the host's business (browser storage, a
//! settings file, nothing at all); the player only talks to this trait.

use std::collections::HashMap;

/// Key-value store for persisted user preferences.
pub trait PreferenceStore: Send {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str);
}

/// Process-local store, the default when the host injects nothing.
#[derive(Debug, Default)]
pub struct MemoryPrefs {
    values: HashMap<String, String>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}
