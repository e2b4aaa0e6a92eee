//! Persisted user preferences (a small string key-value store).

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Key-value persistence. Implementations swallow I/O errors after logging them;
/// a preference that fails to save is simply not remembered.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Volatile store, for tests and hosts without storage.
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferences {
    values: BTreeMap<String, String>,
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// RON map on disk, rewritten on every `set`.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePreferences {
    /// Open (or start empty when the file is missing or unreadable).
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(data) => ron::from_str(&data).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable preferences {:?}: {}", path, e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, values }
    }

    fn persist(&self) {
        match ron::ser::to_string_pretty(&self.values, ron::ser::PrettyConfig::default()) {
            Ok(s) => {
                if let Err(e) = std::fs::write(&self.path, s) {
                    log::warn!("Could not write preferences to {:?}: {}", self.path, e);
                }
            }
            Err(e) => log::warn!("Could not serialise preferences: {}", e),
        }
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        self.persist();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_survives_reopen() {
        let path = std::env::temp_dir().join(format!("whiteout-prefs-{}.ron", std::process::id()));
        let _ = std::fs::remove_file(&path);
        {
            let mut store = FilePreferences::open(&path);
            assert_eq!(store.get("lang"), None);
            store.set("lang", "tr");
        }
        let store = FilePreferences::open(&path);
        assert_eq!(store.get("lang").as_deref(), Some("tr"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn garbage_file_starts_empty() {
        let path = std::env::temp_dir().join(format!("whiteout-prefs-bad-{}.ron", std::process::id()));
        std::fs::write(&path, "{{{ not ron").unwrap();
        let store = FilePreferences::open(&path);
        assert_eq!(store.get("lang"), None);
        let _ = std::fs::remove_file(&path);
    }
}
