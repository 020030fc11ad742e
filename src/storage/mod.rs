// SPDX-License-Identifier: PMPL-1.0-or-later

//! Persistent preference storage.
//!
//! The only thing the shell persists is the chosen interface language, stored
//! under [`LANGUAGE_KEY`]. The file backend keeps a flat JSON object so other
//! string preferences can sit next to it.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const LANGUAGE_KEY: &str = "cbdb-language";

pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-process store; nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: BTreeMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value.to_string());
        store
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON-file store. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/preferences.json`, defaulting to the working directory.
    pub fn in_directory(directory: Option<&Path>) -> Self {
        let base = directory
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join("preferences.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("reading preferences {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("parsing preferences {}", self.path.display()))
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let payload = serde_json::to_string_pretty(&values)?;
        fs::write(&self.path, payload)
            .with_context(|| format!("writing preferences {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let store = FilePreferences::in_directory(Some(dir.path()));
        assert_eq!(store.get(LANGUAGE_KEY).unwrap(), None);
    }

    #[test]
    fn file_store_round_trips_and_keeps_other_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/prefs.json");
        let mut store = FilePreferences::new(&path);
        store.set("theme", "dark").unwrap();
        store.set(LANGUAGE_KEY, "zh").unwrap();

        let reopened = FilePreferences::new(&path);
        assert_eq!(reopened.get(LANGUAGE_KEY).unwrap().as_deref(), Some("zh"));
        assert_eq!(reopened.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json").unwrap();
        assert!(FilePreferences::new(&path).get(LANGUAGE_KEY).is_err());
    }
}
