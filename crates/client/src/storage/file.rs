use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::sync::Arc;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::RwLock;

use super::{StorageError, TokenStorage};

/// File name used under the platform data directory by
/// [`FileTokenStorage::open_default`].
pub const TOKENS_FILE: &str = "tokens.json";

/// Token storage persisted as a JSON object in a single file.
///
/// The whole map is rewritten on every mutation; token churn is a few
/// writes per session, so there is no need for anything smarter. Clones
/// share the in-process cache and the file.
#[derive(Clone, Debug)]
pub struct FileTokenStorage {
    path: Utf8PathBuf,
    cache: Arc<RwLock<BTreeMap<String, String>>>,
}

impl FileTokenStorage {
    /// Open (or create) the storage file at `path`.
    pub fn open(path: impl Into<Utf8PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let cache = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path,
            cache: Arc::new(RwLock::new(cache)),
        })
    }

    /// Open the storage file at its conventional location,
    /// `<platform data dir>/investpro/tokens.json`.
    pub fn open_default() -> Result<Self, StorageError> {
        let base = dirs::data_local_dir()
            .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok())
            .ok_or_else(|| {
                StorageError::NoLocation("platform data directory unavailable".to_owned())
            })?;
        Self::open(base.join("investpro").join(TOKENS_FILE))
    }

    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn persist(&self, data: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(data)?)?;
        Ok(())
    }
}

#[async_trait]
impl TokenStorage for FileTokenStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.cache.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut data = self.cache.write();
        drop(data.insert(key.to_owned(), value.to_owned()));
        self.persist(&data)
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut data = self.cache.write();
        drop(data.remove(key));
        self.persist(&data)
    }
}
