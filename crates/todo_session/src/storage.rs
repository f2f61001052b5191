//! Session storage trait and implementations

use crate::error::{Result, SessionError};
use crate::structs::SessionBag;
use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

/// Sessions kept by [`MemorySessionStorage::new`] before the least recently
/// used one is dropped
pub const DEFAULT_SESSION_CAPACITY: usize = 10_000;

/// Where session bags live between requests
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Load a session bag. Unknown ids yield [`SessionError::NotFound`].
    async fn load_session(&self, session_id: &str) -> Result<SessionBag>;

    /// Save a session bag, replacing whatever was stored before
    async fn save_session(&self, session_id: &str, bag: &SessionBag) -> Result<()>;
}

/// In-process storage. Sessions vanish when the server stops, and past
/// `capacity` the least recently used session is evicted.
pub struct MemorySessionStorage {
    sessions: Mutex<LruCache<String, SessionBag>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SESSION_CAPACITY)
    }

    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            sessions: Mutex::new(LruCache::new(capacity)),
        }
    }
}

impl Default for MemorySessionStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn load_session(&self, session_id: &str) -> Result<SessionBag> {
        self.sessions
            .lock()
            .await
            .get(session_id)
            .cloned()
            .ok_or(SessionError::NotFound)
    }

    async fn save_session(&self, session_id: &str, bag: &SessionBag) -> Result<()> {
        let mut sessions = self.sessions.lock().await;
        if let Some((evicted, _)) = sessions.push(session_id.to_string(), bag.clone()) {
            if evicted != session_id {
                tracing::debug!(session_id = %evicted, "session evicted from memory");
            }
        }
        Ok(())
    }
}

/// File-based session storage, one JSON document per session
#[derive(Clone)]
pub struct FileSessionStorage {
    base_path: PathBuf,
}

impl FileSessionStorage {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn session_path(&self, session_id: &str) -> Result<PathBuf> {
        // Session ids come from cookies; keep them from escaping base_path.
        let is_safe = !session_id.is_empty()
            && session_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !is_safe {
            return Err(SessionError::StorageError(format!(
                "invalid session id '{session_id}'"
            )));
        }
        Ok(self.base_path.join(format!("{}.json", session_id)))
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn load_session(&self, session_id: &str) -> Result<SessionBag> {
        let path = match self.session_path(session_id) {
            Ok(path) => path,
            Err(_) => return Err(SessionError::NotFound),
        };

        if !path.exists() {
            return Err(SessionError::NotFound);
        }

        let contents = fs::read_to_string(&path).await?;
        let bag: SessionBag = serde_json::from_str(&contents)?;

        Ok(bag)
    }

    async fn save_session(&self, session_id: &str, bag: &SessionBag) -> Result<()> {
        let path = self.session_path(session_id)?;
        fs::create_dir_all(&self.base_path).await?;

        let contents = serde_json::to_string_pretty(bag)?;
        fs::write(&path, contents).await?;
        tracing::trace!(session_id, "session written to {}", path.display());

        Ok(())
    }
}
