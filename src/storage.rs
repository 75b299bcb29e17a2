use std::path::PathBuf;

use thiserror::Error;

pub mod file;
#[cfg(test)]
pub mod memory;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read '{path}': {source}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON stored under '{key}': {source}")]
    ParseFailed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    SaveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize purchases to JSON: {source}")]
    SerializeFailed {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to remove '{path}': {source}")]
    ClearFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// String key-value storage. A missing key is not an error.
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
