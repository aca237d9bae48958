//!
//! cityalert credential storage
//! ----------------------------
//! Durable local key/value medium backing the per-role credential cache.
//! Values are opaque strings: the session token under `<role>_token` and the
//! serialized user record under `<role>_token_user`. The medium guarantees
//! single-key atomicity only; callers order multi-key writes themselves and
//! treat a half-written pair as absent.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::{fs, io};
use parking_lot::RwLock;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache io: {0}")]
    Io(#[from] io::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Injectable key/value seam. Tests supply `MemoryCache`; the console uses a
/// `FileCache` rooted at the configured data directory.
pub trait CredentialCache: Send + Sync {
    fn get(&self, key: &str) -> CacheResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> CacheResult<()>;
    fn remove(&self, key: &str) -> CacheResult<()>;
}

fn sanitize_filename(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// File-backed cache: one file per key under a root folder, surviving process
/// restarts. Writes go to a temp file and rename into place so a single key
/// is never observed half-written.
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    /// Create a cache rooted at the given folder, creating it if needed.
    pub fn new<P: AsRef<Path>>(root: P) -> CacheResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root_path(&self) -> &PathBuf { &self.root }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.val", sanitize_filename(key)))
    }
}

impl CredentialCache for FileCache {
    fn get(&self, key: &str) -> CacheResult<Option<String>> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> CacheResult<()> {
        let path = self.key_path(key);
        let tmp = path.with_extension("val.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!(target: "cityalert::storage", "set key='{}'", key);
        Ok(())
    }

    fn remove(&self, key: &str) -> CacheResult<()> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => {
                debug!(target: "cityalert::storage", "removed key='{}'", key);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory cache for tests and ephemeral contexts.
#[derive(Default)]
pub struct MemoryCache {
    map: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self { Self::default() }
}

impl CredentialCache for MemoryCache {
    fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.map.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CacheResult<()> {
        self.map.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CacheResult<()> {
        self.map.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_cache_roundtrip_and_remove() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = FileCache::new(tmp.path()).unwrap();
        assert_eq!(cache.get("citizen_token").unwrap(), None);
        cache.set("citizen_token", "citizen_1_1700000000000").unwrap();
        assert_eq!(
            cache.get("citizen_token").unwrap().as_deref(),
            Some("citizen_1_1700000000000")
        );
        cache.remove("citizen_token").unwrap();
        assert_eq!(cache.get("citizen_token").unwrap(), None);
    }

    #[test]
    fn file_cache_remove_missing_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = FileCache::new(tmp.path()).unwrap();
        cache.remove("never_written").unwrap();
    }

    #[test]
    fn file_cache_survives_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let cache = FileCache::new(tmp.path()).unwrap();
            cache.set("responder_token", "responder_2_1").unwrap();
        }
        let reopened = FileCache::new(tmp.path()).unwrap();
        assert_eq!(
            reopened.get("responder_token").unwrap().as_deref(),
            Some("responder_2_1")
        );
    }

    #[test]
    fn file_cache_overwrite_replaces_value() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = FileCache::new(tmp.path()).unwrap();
        cache.set("k", "first").unwrap();
        cache.set("k", "second").unwrap();
        assert_eq!(cache.get("k").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn sanitized_keys_do_not_collide_with_plain_files() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = FileCache::new(tmp.path()).unwrap();
        cache.set("a/b", "x").unwrap();
        assert_eq!(cache.get("a/b").unwrap().as_deref(), Some("x"));
        // The slash never reaches the filesystem
        assert!(tmp.path().join("a_b.val").exists());
    }

    #[test]
    fn memory_cache_roundtrip() {
        let cache = MemoryCache::new();
        cache.set("k", "v").unwrap();
        assert_eq!(cache.get("k").unwrap().as_deref(), Some("v"));
        cache.remove("k").unwrap();
        assert_eq!(cache.get("k").unwrap(), None);
        cache.remove("k").unwrap();
    }
}
