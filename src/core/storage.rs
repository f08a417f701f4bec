//! Object storage for uploaded files

use std::path::{Path, PathBuf};

use chrono::Utc;
use miette::Diagnostic;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::core::identity::RecordId;
use crate::core::user::CurrentUser;

#[derive(Debug, Error, Diagnostic)]
pub enum StorageError {
    #[error("failed to write object '{key}': {message}")]
    #[diagnostic(code(sbench::storage::write))]
    Write { key: String, message: String },

    #[error("failed to read object '{key}': {message}")]
    #[diagnostic(code(sbench::storage::read))]
    Read { key: String, message: String },

    #[error("failed to delete object '{key}': {message}")]
    #[diagnostic(code(sbench::storage::delete))]
    Delete { key: String, message: String },

    #[error("invalid object key '{0}'")]
    #[diagnostic(code(sbench::storage::invalid_key))]
    InvalidKey(String),
}

/// Where an upload was stored and what it hashed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub size: u64,
    pub sha256: String,
}

/// Blob storage keyed by `{user}/{project}/{timestamp}.{ext}`
pub trait ObjectStore {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<StoredObject, StorageError>;
    fn get(&self, key: &str) -> Result<Vec<u8>, StorageError>;
    /// Remove an object; a missing object is not an error
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Build an object key; the timestamp is epoch milliseconds
pub fn object_key(user: &CurrentUser, project_id: &RecordId, timestamp_ms: i64, extension: &str) -> String {
    let ext = extension.trim_start_matches('.').to_lowercase();
    if ext.is_empty() {
        format!("{}/{}/{}", user.key_segment(), project_id, timestamp_ms)
    } else {
        format!("{}/{}/{}.{}", user.key_segment(), project_id, timestamp_ms, ext)
    }
}

/// Object key for an upload made now
pub fn object_key_now(user: &CurrentUser, project_id: &RecordId, original_filename: &str) -> String {
    let ext = Path::new(original_filename)
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
    object_key(user, project_id, Utc::now().timestamp_millis(), &ext)
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Object store on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let rel = Path::new(key);
        let safe = !key.is_empty()
            && rel
                .components()
                .all(|c| matches!(c, std::path::Component::Normal(_)));
        if !safe {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(rel))
    }
}

impl ObjectStore for LocalObjectStore {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<StoredObject, StorageError> {
        let path = self.path_for(key)?;
        let write_err = |e: std::io::Error| StorageError::Write {
            key: key.to_string(),
            message: e.to_string(),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(&path, bytes).map_err(write_err)?;

        tracing::debug!(key, bytes = bytes.len(), "object stored");
        Ok(StoredObject {
            key: key.to_string(),
            size: bytes.len() as u64,
            sha256: sha256_hex(bytes),
        })
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(key)?;
        std::fs::read(&path).map_err(|e| StorageError::Read {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(key, "object deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Delete {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::RecordPrefix;

    #[test]
    fn test_object_key_layout() {
        let project = RecordId::new(RecordPrefix::Proj);
        let key = object_key(&CurrentUser::new("ana"), &project, 1_700_000_000_123, ".XLSX");
        assert_eq!(key, format!("ana/{}/1700000000123.xlsx", project));
    }

    #[test]
    fn test_put_and_get() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(tmp.path());
        let stored = store.put("ana/p/1.csv", b"ID,Indicator text\n").unwrap();
        assert_eq!(stored.size, 18);
        assert_eq!(stored.sha256.len(), 64);
        assert_eq!(store.get("ana/p/1.csv").unwrap(), b"ID,Indicator text\n");
        assert!(tmp.path().join("ana/p/1.csv").exists());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(tmp.path());
        store.put("ana/p/1.csv", b"x").unwrap();
        store.delete("ana/p/1.csv").unwrap();
        assert!(!tmp.path().join("ana/p/1.csv").exists());
        store.delete("ana/p/1.csv").unwrap();
        assert!(matches!(store.delete("../x"), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn test_rejects_escaping_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(tmp.path());
        assert!(matches!(store.put("../x", b""), Err(StorageError::InvalidKey(_))));
        assert!(matches!(store.put("/etc/x", b""), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn test_sha256_known_value() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
