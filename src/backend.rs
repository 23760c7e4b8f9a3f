// src/backend.rs
use log;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// A byte-string key-value store. Both operations may block on I/O.
pub trait KeyValueBackend {
    /// Returns `Ok(None)` when nothing is stored under `key`.
    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>>;

    /// Replaces whatever is stored under `key`.
    fn set(&self, key: &str, value: &[u8]) -> io::Result<()>;
}

/// Keeps each key in its own file inside `dir`.
///
/// File names are the hex encoding of the key, so keys such as
/// `@savepass:logins` need no escaping on any platform.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileBackend { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.kv", hex::encode(key.as_bytes())))
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => {
                log::debug!("Read {} bytes for key {:?} from {:?}", bytes.len(), key, path);
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No value stored for key {:?} (no file at {:?})", key, path);
                Ok(None)
            }
            Err(e) => {
                log::error!("Failed to read {:?} for key {:?}: {:?}", path, key, e);
                Err(e)
            }
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            log::error!("Failed to create storage directory {:?}: {:?}", self.dir, e);
            e
        })?;

        let path = self.path_for(key);
        let tmp_path = path.with_extension("kv.tmp");

        // The target is only replaced once the full value is on disk.
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)
            .map_err(|e| {
                log::error!("Failed to open {:?} for writing: {:?}", tmp_path, e);
                e
            })?;
        file.write_all(value).map_err(|e| { log::error!("Failed to write value to {:?}: {:?}", tmp_path, e); e })?;
        file.sync_all().map_err(|e| { log::error!("Failed to sync {:?}: {:?}", tmp_path, e); e })?;
        drop(file);

        fs::rename(&tmp_path, &path).map_err(|e| {
            log::error!("Failed to move {:?} into place at {:?}: {:?}", tmp_path, path, e);
            let _ = fs::remove_file(&tmp_path);
            e
        })?;

        log::debug!("Wrote {} bytes for key {:?} to {:?}", value.len(), key, path);
        Ok(())
    }
}

/// In-process backend. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    values: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        MemoryBackend::default()
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.values
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "memory backend lock poisoned"))
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> io::Result<()> {
        self.lock()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_backend_missing_key_is_none() {
        let dir = tempdir().expect("Failed to create temp dir");
        let backend = FileBackend::new(dir.path());
        assert_eq!(backend.get("@savepass:logins").unwrap(), None);
    }

    #[test]
    fn test_file_backend_set_then_get() {
        let dir = tempdir().expect("Failed to create temp dir");
        let backend = FileBackend::new(dir.path().join("nested").join("store"));

        backend.set("@savepass:logins", b"[]").unwrap();
        assert_eq!(backend.get("@savepass:logins").unwrap(), Some(b"[]".to_vec()));

        backend.set("@savepass:logins", b"[1]").unwrap();
        assert_eq!(backend.get("@savepass:logins").unwrap(), Some(b"[1]".to_vec()));
    }

    #[test]
    fn test_file_backend_uses_hex_file_names_and_leaves_no_temp_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let backend = FileBackend::new(dir.path());
        backend.set("a:b", b"x").unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![format!("{}.kv", hex::encode("a:b"))]);
    }

    #[test]
    fn test_file_backend_read_error_is_reported() {
        let dir = tempdir().expect("Failed to create temp dir");
        let backend = FileBackend::new(dir.path());
        // A directory where the value file should be cannot be read as a file.
        fs::create_dir(backend.path_for("k")).unwrap();
        assert!(backend.get("k").is_err());
    }

    #[test]
    fn test_file_backend_failed_write_keeps_old_value() {
        let dir = tempdir().expect("Failed to create temp dir");
        let backend = FileBackend::new(dir.path());
        backend.set("k", b"old").unwrap();

        // Occupy the temp path so the new value cannot be written.
        fs::create_dir(backend.path_for("k").with_extension("kv.tmp")).unwrap();

        assert!(backend.set("k", b"new").is_err());
        assert_eq!(backend.get("k").unwrap(), Some(b"old".to_vec()));
    }

    #[test]
    fn test_memory_backend_clones_share_state() {
        let a = MemoryBackend::new();
        let b = a.clone();
        a.set("k", b"v").unwrap();
        assert_eq!(b.get("k").unwrap(), Some(b"v".to_vec()));
        assert_eq!(b.get("other").unwrap(), None);
    }
}
