use std::{
    fs::{self, OpenOptions, rename, write},
    path::PathBuf,
};

use fs2::FileExt;
use uuid::Uuid;

use crate::storage::{Storage, StorageError};

/// One file per key, `<dir>/<key>.json`
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn lock_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.lock", key))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::LoadFailed { path, source: e }),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|e| StorageError::SaveFailed {
            path: self.dir.clone(),
            source: e,
        })?;

        let path = self.path_for(key);

        let lock_file_path = self.lock_path_for(key);
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_file_path)
            .map_err(|e| StorageError::SaveFailed {
                path: lock_file_path.clone(),
                source: e,
            })?;
        lock_file
            .lock_exclusive()
            .map_err(|e| StorageError::SaveFailed {
                path: lock_file_path,
                source: e,
            })?;

        // Written aside and renamed into place so readers never see a partial value
        let temp_path = PathBuf::from(format!("{}.tmp.{}", path.display(), Uuid::new_v4()));
        if let Err(e) = write(&temp_path, value) {
            let _ = fs::remove_file(&temp_path);
            return Err(StorageError::SaveFailed {
                path: temp_path,
                source: e,
            });
        }

        if let Err(e) = rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(StorageError::SaveFailed { path, source: e });
        }

        lock_file.unlock().map_err(|e| StorageError::SaveFailed {
            path: path.clone(),
            source: e,
        })?;

        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::ClearFailed { path, source: e }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_dir(name: &str) -> PathBuf {
        let dir = PathBuf::from("/tmp").join(name);
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_set_and_get_item() {
        let dir = fresh_dir("worldlots_file_storage_roundtrip");
        let storage = FileStorage::new(dir.clone());

        storage.set_item("purchases", "[1,2,3]").unwrap();
        assert_eq!(
            storage.get_item("purchases").unwrap().as_deref(),
            Some("[1,2,3]")
        );

        storage.set_item("purchases", "[]").unwrap();
        assert_eq!(storage.get_item("purchases").unwrap().as_deref(), Some("[]"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_key_reads_as_none() {
        let dir = fresh_dir("worldlots_file_storage_missing");
        let storage = FileStorage::new(dir);

        assert!(storage.get_item("nothing-here").unwrap().is_none());
    }

    #[test]
    fn test_remove_item_is_idempotent() {
        let dir = fresh_dir("worldlots_file_storage_remove");
        let storage = FileStorage::new(dir.clone());

        storage.set_item("purchases", "[]").unwrap();
        storage.remove_item("purchases").unwrap();
        assert!(storage.get_item("purchases").unwrap().is_none());
        assert!(!storage.path_for("purchases").exists());

        storage.remove_item("purchases").unwrap();

        fs::remove_dir_all(&dir).unwrap();
    }

    fn temp_files_in(dir: &PathBuf) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp."))
            .count()
    }

    #[test]
    fn test_failed_lock_leaves_no_temp_file() {
        let dir = fresh_dir("worldlots_file_storage_lock_failure");
        let storage = FileStorage::new(dir.clone());
        // A directory where the lock file belongs cannot be opened for writing
        fs::create_dir_all(dir.join("purchases.lock")).unwrap();

        assert!(matches!(
            storage.set_item("purchases", "[]"),
            Err(StorageError::SaveFailed { .. })
        ));
        assert_eq!(temp_files_in(&dir), 0);
        assert!(!storage.path_for("purchases").exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_failed_rename_leaves_no_temp_file() {
        let dir = fresh_dir("worldlots_file_storage_rename_failure");
        let storage = FileStorage::new(dir.clone());
        fs::create_dir_all(storage.path_for("purchases").join("occupied")).unwrap();

        assert!(storage.set_item("purchases", "[]").is_err());
        assert_eq!(temp_files_in(&dir), 0);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = fresh_dir("worldlots_file_storage_temp");
        let storage = FileStorage::new(dir.clone());

        storage.set_item("purchases", "[]").unwrap();
        assert_eq!(temp_files_in(&dir), 0);

        fs::remove_dir_all(&dir).unwrap();
    }
}
