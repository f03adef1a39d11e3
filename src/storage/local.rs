//! Key/value JSON document file.
//!
//! One JSON object on disk, each key holding an arbitrary JSON value.
//! Writes go to a sibling temp file first and are renamed into place.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::StorageError;

/// Synchronous key/value file.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn corrupt(&self, reason: impl ToString) -> StorageError {
        StorageError::Corrupt {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Read the whole document. A missing or blank file is empty; anything
    /// that is not a JSON object is an error and the file is left as is.
    fn read_document(&self) -> Result<Map<String, Value>, StorageError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(self.corrupt("top-level value is not an object")),
            Err(e) => Err(self.corrupt(e)),
        }
    }

    fn write_document(&self, doc: &Map<String, Value>) -> Result<(), StorageError> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| StorageError::InvalidPath(self.path.display().to_string()))?;
        fs::create_dir_all(parent)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(doc)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Wrote {} keys to {:?}", doc.len(), self.path);
        Ok(())
    }

    /// Raw JSON under `key`.
    pub fn get_raw(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.read_document()?.remove(key))
    }

    /// Store `value` under `key`, keeping other keys. Fails without
    /// touching the file when the existing document is unreadable.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let mut doc = self.read_document()?;
        doc.insert(key.to_string(), serde_json::to_value(value)?);
        self.write_document(&doc)
    }
}
