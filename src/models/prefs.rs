// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Persisted key/value preferences with per-key defaults.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Key holding the last base directory a book was exported below.
pub const LAST_DIR_KEY: &str = "lastDir";

/// Preference values plus the defaults reported for unset keys.
///
/// Only explicitly set values are persisted; defaults live for one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Prefs {
    values: BTreeMap<String, String>,
    defaults: BTreeMap<String, String>,
}

impl Prefs {
    pub fn from_values(values: BTreeMap<String, String>) -> Self {
        Self {
            values,
            defaults: BTreeMap::new(),
        }
    }

    pub fn set_default(&mut self, key: &str, value: impl Into<String>) {
        self.defaults.insert(key.to_string(), value.into());
    }

    /// Stored value for `key`, or its default when unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .or_else(|| self.defaults.get(key))
            .map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }
}

/// JSON file backing a [`Prefs`] record.
#[derive(Clone, Debug)]
pub struct PrefsFile {
    path: PathBuf,
}

impl PrefsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location: `~/.config/folderout/prefs.json`.
    pub fn default_path() -> Option<PathBuf> {
        home::home_dir().map(|home| home.join(".config").join("folderout").join("prefs.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load preferences; a missing file yields an empty record.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or is not a
    /// JSON object of strings.
    pub fn load(&self) -> Result<Prefs> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Prefs::default()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read preferences {:?}", self.path));
            }
        };
        let values: BTreeMap<String, String> = serde_json::from_str(&content)
            .with_context(|| format!("Invalid preferences file {:?}", self.path))?;
        Ok(Prefs::from_values(values))
    }

    /// Persist the explicitly set values, creating parent directories.
    pub fn save(&self, prefs: &Prefs) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create preferences directory {:?}", parent))?;
        }
        let bytes = serde_json::to_vec_pretty(prefs.values())?;
        fs::write(&self.path, bytes)
            .with_context(|| format!("Failed to write preferences {:?}", self.path))
    }
}
