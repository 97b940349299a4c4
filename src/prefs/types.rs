use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key/value store for remembered settings.
///
/// Only scalar ratings are stored; the helper keeps a single "last used rating".
pub trait PreferenceStore {
    /// Stored value for `key`, or `default` when nothing has been stored.
    fn get(&self, key: &str, default: f64) -> f64;

    fn set(&mut self, key: &str, value: f64) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceState {
    pub version: u32,
    #[serde(default)]
    pub values: HashMap<String, PreferenceEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceEntry {
    pub value: f64,
    pub updated_at: DateTime<Utc>,
}

impl Default for PreferenceState {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceState {
    /// Create a new empty preference state with version 1
    pub fn new() -> Self {
        Self {
            version: 1,
            values: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PreferenceEntry> {
        self.values.get(key)
    }

    /// Record `value` under `key`, replacing any previous entry
    pub fn set(&mut self, key: &str, value: f64) {
        let entry = PreferenceEntry {
            value,
            updated_at: Utc::now(),
        };
        self.values.insert(key.to_string(), entry);
    }
}

/// In-memory store. Nothing outlives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    state: PreferenceState,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with an existing state (e.g. a dry run over the real file's contents)
    pub fn with_state(state: PreferenceState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &PreferenceState {
        &self.state
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str, default: f64) -> f64 {
        self.state.get(key).map_or(default, |e| e.value)
    }

    fn set(&mut self, key: &str, value: f64) -> Result<()> {
        self.state.set(key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_empty() {
        let state = PreferenceState::new();
        assert_eq!(state.version, 1);
        assert!(state.values.is_empty());
    }

    #[test]
    fn test_get_falls_back_to_default() {
        let store = MemoryPreferenceStore::new();
        assert_eq!(store.get("last_used_rating", 2.5), 2.5);
    }

    #[test]
    fn test_last_write_wins() {
        let mut store = MemoryPreferenceStore::new();
        store.set("last_used_rating", 3.0).unwrap();
        store.set("last_used_rating", 4.5).unwrap();
        assert_eq!(store.get("last_used_rating", 2.5), 4.5);
        assert_eq!(store.state().values.len(), 1);
    }

    #[test]
    fn test_keys_are_independent() {
        let mut store = MemoryPreferenceStore::new();
        store.set("a", 3.0).unwrap();
        assert_eq!(store.get("b", 1.0), 1.0);
    }

    #[test]
    fn test_state_json_shape() {
        let mut state = PreferenceState::new();
        state.set("last_used_rating", 3.5);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["values"]["last_used_rating"]["value"], 3.5);
        assert!(json["values"]["last_used_rating"]["updated_at"].is_string());
    }
}
