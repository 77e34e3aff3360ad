//! File-based storage backend.

use crate::error::{Error, Result};
use crate::storage::traits::SlotStorage;
use std::fs;
use std::path::PathBuf;

/// File-based slot storage with atomic writes.
///
/// Each key lives in `<base_dir>/storage/<key>.json`.
#[derive(Debug)]
pub struct FileBackend {
    base_dir: PathBuf,
}

impl FileBackend {
    /// Create a new file backend.
    ///
    /// Creates the storage directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage directory cannot be created.
    pub fn new(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(base_dir.join("storage"))?;
        Ok(Self { base_dir })
    }

    /// Get the path to a slot file.
    fn slot_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.base_dir.join("storage").join(format!("{key}.json")))
    }
}

/// Keys become file names, so only a conservative character set is allowed.
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidKey(key.to_string()))
    }
}

impl SlotStorage for FileBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        let temp = path.with_extension("tmp");

        fs::write(&temp, value)?;

        // Rename is atomic, a crash mid-write leaves the previous document intact
        fs::rename(&temp, &path)?;

        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_backend() -> (FileBackend, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::new(temp_dir.path().to_path_buf()).unwrap();
        (backend, temp_dir)
    }

    #[test]
    fn creates_storage_directory() {
        let temp_dir = TempDir::new().unwrap();
        let _backend = FileBackend::new(temp_dir.path().to_path_buf()).unwrap();
        assert!(temp_dir.path().join("storage").exists());
    }

    #[test]
    fn get_missing_item() {
        let (backend, _temp) = create_test_backend();
        assert!(backend.get_item("chatHistory").unwrap().is_none());
    }

    #[test]
    fn set_and_get_item() {
        let (backend, _temp) = create_test_backend();
        backend.set_item("chatHistory", r#"{"a":1}"#).unwrap();
        assert_eq!(
            backend.get_item("chatHistory").unwrap().as_deref(),
            Some(r#"{"a":1}"#)
        );
    }

    #[test]
    fn set_item_overwrites_whole_document() {
        let (backend, _temp) = create_test_backend();
        backend.set_item("chatHistory", "first version").unwrap();
        backend.set_item("chatHistory", "second").unwrap();
        assert_eq!(
            backend.get_item("chatHistory").unwrap().as_deref(),
            Some("second")
        );
    }

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let (backend, temp_dir) = create_test_backend();
        backend.set_item("chatHistory", "{}").unwrap();

        let storage = temp_dir.path().join("storage");
        assert!(!storage.join("chatHistory.tmp").exists());
        assert!(storage.join("chatHistory.json").exists());
    }

    #[test]
    fn remove_item_deletes_file() {
        let (backend, temp_dir) = create_test_backend();
        backend.set_item("chatHistory", "{}").unwrap();
        backend.remove_item("chatHistory").unwrap();

        assert!(!temp_dir.path().join("storage/chatHistory.json").exists());
        assert!(backend.get_item("chatHistory").unwrap().is_none());
    }

    #[test]
    fn remove_missing_item_succeeds() {
        let (backend, _temp) = create_test_backend();
        backend.remove_item("nothing-here").unwrap();
    }

    #[test]
    fn rejects_path_traversal_keys() {
        let (backend, _temp) = create_test_backend();
        for key in ["../escape", "a/b", "", ".hidden", "with space"] {
            assert!(
                matches!(backend.set_item(key, "x"), Err(Error::InvalidKey(_))),
                "key {key:?} should be rejected"
            );
        }
    }

    #[test]
    fn keys_are_isolated() {
        let (backend, _temp) = create_test_backend();
        backend.set_item("one", "1").unwrap();
        backend.set_item("two", "2").unwrap();
        assert_eq!(backend.get_item("one").unwrap().as_deref(), Some("1"));
        assert_eq!(backend.get_item("two").unwrap().as_deref(), Some("2"));
    }
}
