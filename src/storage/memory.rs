use std::{cell::RefCell, collections::HashMap, io, path::PathBuf};

use crate::storage::{Storage, StorageError};

/// Volatile storage, lost when dropped
#[derive(Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
    read_only: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write fails, as a full or locked-down store would
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    pub fn with_item(self, key: &str, value: &str) -> Self {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    fn check_writable(&self, key: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::SaveFailed {
                path: PathBuf::from(key),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "storage is read-only"),
            });
        }
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}
