//! Local durable storage.
//!
//! Handles the small amount of state kept on disk:
//! - A key/value file of JSON documents (`local_storage.json`)
//! - The favorite leagues list stored under one key of it

pub mod favorites;
pub mod local;

use std::path::PathBuf;
use thiserror::Error;

pub use favorites::FavoritesStore;
pub use local::LocalStore;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Unreadable storage file {path}: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// The key/value document file.
    pub fn local_storage_path(&self) -> PathBuf {
        self.data_dir.join("local_storage.json")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
