// ABOUTME: Client-local key/value store persisted as a JSON file in the user data directory
// ABOUTME: Holds the playground API key, chat selections and the CLI session token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Local Store
//!
//! The browser keeps these values in `localStorage`; the CLI keeps them here.
//! Every write is flushed to disk immediately.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::storage;
use crate::errors::{AppError, AppResult};

/// JSON-backed string map
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl LocalStore {
    /// Default location: `<data dir>/xaze/local_store.json`
    ///
    /// # Errors
    ///
    /// Returns a storage error when the platform has no data directory
    pub fn default_path() -> AppResult<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join(storage::APP_DIR).join(storage::FILE_NAME))
            .ok_or_else(|| AppError::storage("No user data directory available"))
    }

    /// Open the store at the default location
    ///
    /// # Errors
    ///
    /// Returns a storage error when the location is unknown or unreadable
    pub fn open_default() -> AppResult<Self> {
        Self::open(Self::default_path()?)
    }

    /// Open a store file; a missing file is an empty store
    ///
    /// A file that is not a JSON string map is ignored and will be replaced on
    /// the next write.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the file exists but cannot be read
    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable local store");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, values })
    }

    /// File backing the store
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored value for `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Store `value` under `key`
    ///
    /// # Errors
    ///
    /// Returns a storage error when the file cannot be written
    pub fn set(&mut self, key: &str, value: &str) -> AppResult<()> {
        self.values.insert(key.to_owned(), value.to_owned());
        self.save()
    }

    /// Store `value` when present, otherwise remove `key`
    ///
    /// # Errors
    ///
    /// Returns a storage error when the file cannot be written
    pub fn set_or_remove(&mut self, key: &str, value: Option<&str>) -> AppResult<()> {
        match value.filter(|v| !v.is_empty()) {
            Some(value) => self.set(key, value),
            None => self.remove(key),
        }
    }

    /// Remove `key`
    ///
    /// # Errors
    ///
    /// Returns a storage error when the file cannot be written
    pub fn remove(&mut self, key: &str) -> AppResult<()> {
        if self.values.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }

    fn save(&self) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), entries = self.values.len(), "Local store saved");
        Ok(())
    }
}
