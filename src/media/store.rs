use std::fs;
use std::path::{Path, PathBuf};

use crate::error::UploadError;

/// Where published images end up. `put_public` stores the staged file under
/// `key` with public visibility and returns the URL it will be served from.
/// A bucket-backed client slots in behind the same trait.
pub trait ObjectStore {
    fn put_public(&self, key: &str, staged: &Path) -> Result<String, UploadError>;
}

/// Directory-backed store: objects are plain files under `root`, served
/// from `public_base_url`.
pub struct FsObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsObjectStore {
    pub fn new(root: PathBuf, public_base_url: String) -> Self {
        Self { root, public_base_url }
    }
}

impl ObjectStore for FsObjectStore {
    fn put_public(&self, key: &str, staged: &Path) -> Result<String, UploadError> {
        fs::create_dir_all(&self.root).map_err(|e| UploadError::Store {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        fs::copy(staged, self.root.join(key)).map_err(|e| UploadError::Store {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        Ok(format!("{}/{}", self.public_base_url.trim_end_matches('/'), key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_public_copies_and_returns_url() {
        let staging = tempfile::tempdir().unwrap();
        let store_dir = tempfile::tempdir().unwrap();
        let staged = staging.path().join("cocktail_x.png");
        fs::write(&staged, b"bytes").unwrap();

        let store = FsObjectStore::new(
            store_dir.path().to_path_buf(),
            "http://img.test/cocktails/".to_string(),
        );
        let url = store.put_public("cocktail_x.png", &staged).unwrap();

        assert_eq!(url, "http://img.test/cocktails/cocktail_x.png");
        assert_eq!(fs::read(store_dir.path().join("cocktail_x.png")).unwrap(), b"bytes");
    }

    #[test]
    fn test_missing_staged_file_is_a_store_error() {
        let store_dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(
            store_dir.path().to_path_buf(),
            "http://img.test".to_string(),
        );

        let err = store
            .put_public("cocktail_x.png", Path::new("/nonexistent/cocktail_x.png"))
            .unwrap_err();
        assert!(matches!(err, UploadError::Store { key, .. } if key == "cocktail_x.png"));
    }
}
