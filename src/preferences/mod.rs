//! Persisted user preferences.
//!
//! Preferences are a flat string map. The only key in use is
//! [`DARK_MODE_KEY`], stored as `"true"` or `"false"`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{debug, warn};

use crate::types::Theme;

pub const DARK_MODE_KEY: &str = "darkMode";

const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Failed to read preferences from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write preferences to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Preferences file is malformed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Key/value string storage.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Reads the theme. Missing, unreadable or unknown values mean light.
pub fn load_theme(store: &dyn PreferenceStore) -> Theme {
    match store.get(DARK_MODE_KEY) {
        Ok(Some(value)) if value == "true" => Theme::Dark,
        Ok(_) => Theme::Light,
        Err(e) => {
            warn!("{}", e);
            Theme::Light
        }
    }
}

pub fn store_theme(store: &mut dyn PreferenceStore, theme: Theme) -> Result<(), PreferenceError> {
    let value = if theme.is_dark() { "true" } else { "false" };
    store.set(DARK_MODE_KEY, value)
}

// ============================================================================
// JsonPreferenceStore
// ============================================================================

/// Store backed by `preferences.json` in the data directory.
#[derive(Debug, Clone)]
pub struct JsonPreferenceStore {
    path: PathBuf,
}

impl JsonPreferenceStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(PREFERENCES_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, PreferenceError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|source| PreferenceError::Read {
            path: self.path.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        // A corrupt file is replaced rather than blocking every write.
        let mut values = self.load().unwrap_or_default();
        values.insert(key.to_string(), value.to_string());

        let write_err = |source: std::io::Error| PreferenceError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let content = serde_json::to_string_pretty(&values)?;
        fs::write(&self.path, content).map_err(write_err)?;

        debug!(key, value, "preference stored");
        Ok(())
    }
}

// ============================================================================
// MemoryPreferenceStore
// ============================================================================

/// In-memory store for tests. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryPreferenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod theme_tests {
        use super::*;

        #[test]
        fn test_missing_key_is_light() {
            let store = MemoryPreferenceStore::new();
            assert_eq!(load_theme(&store), Theme::Light);
        }

        #[test]
        fn test_round_trip() {
            let mut store = MemoryPreferenceStore::new();

            store_theme(&mut store, Theme::Dark).unwrap();
            assert_eq!(store.get(DARK_MODE_KEY).unwrap().as_deref(), Some("true"));
            assert_eq!(load_theme(&store), Theme::Dark);

            store_theme(&mut store, Theme::Light).unwrap();
            assert_eq!(store.get(DARK_MODE_KEY).unwrap().as_deref(), Some("false"));
            assert_eq!(load_theme(&store), Theme::Light);
        }

        #[test]
        fn test_unknown_value_is_light() {
            let mut store = MemoryPreferenceStore::new();
            store.set(DARK_MODE_KEY, "yes").unwrap();
            assert_eq!(load_theme(&store), Theme::Light);
        }
    }

    mod json_store_tests {
        use super::*;

        #[test]
        fn test_persists_across_instances() {
            let dir = tempfile::tempdir().unwrap();

            let mut first = JsonPreferenceStore::new(dir.path());
            store_theme(&mut first, Theme::Dark).unwrap();

            let second = JsonPreferenceStore::new(dir.path());
            assert_eq!(load_theme(&second), Theme::Dark);
        }

        #[test]
        fn test_file_format() {
            let dir = tempfile::tempdir().unwrap();
            let mut store = JsonPreferenceStore::new(dir.path());

            store.set(DARK_MODE_KEY, "true").unwrap();

            let content = std::fs::read_to_string(dir.path().join("preferences.json")).unwrap();
            let map: BTreeMap<String, String> = serde_json::from_str(&content).unwrap();
            assert_eq!(map.get("darkMode").map(String::as_str), Some("true"));
        }

        #[test]
        fn test_creates_missing_dir() {
            let dir = tempfile::tempdir().unwrap();
            let nested = dir.path().join("a").join("b");
            let mut store = JsonPreferenceStore::new(&nested);

            store.set(DARK_MODE_KEY, "false").unwrap();

            assert!(nested.join("preferences.json").exists());
        }

        #[test]
        fn test_malformed_file_reads_as_light_and_is_replaced() {
            let dir = tempfile::tempdir().unwrap();
            std::fs::write(dir.path().join("preferences.json"), "{not json").unwrap();
            let mut store = JsonPreferenceStore::new(dir.path());

            assert!(matches!(store.get(DARK_MODE_KEY), Err(PreferenceError::Parse(_))));
            assert_eq!(load_theme(&store), Theme::Light);

            store_theme(&mut store, Theme::Dark).unwrap();
            assert_eq!(load_theme(&store), Theme::Dark);
        }
    }
}
