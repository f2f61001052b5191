//! Session Manager service

use crate::error::{Result, SessionError};
use crate::repository::is_blank;
use crate::storage::SessionStorage;
use crate::structs::SessionBag;
use std::sync::Arc;
use uuid::Uuid;

/// A session bag together with the id it is stored under.
#[derive(Debug, Clone)]
pub struct LoadedSession {
    pub id: String,
    pub bag: SessionBag,
    /// True when no stored session matched and a fresh one was started
    pub is_new: bool,
}

impl LoadedSession {
    /// A fresh session that picked up nothing beyond the seeded empty
    /// `lists` is not stored, so anonymous reads leave no trace.
    pub fn needs_saving(&self) -> bool {
        !self.is_new || !is_blank(&self.bag)
    }
}

/// Session Manager - resolves session ids to bags and writes them back.
///
/// No locking happens across requests: two requests for the same session
/// each load their own copy and the later save wins.
#[derive(Clone)]
pub struct SessionManager {
    storage: Arc<dyn SessionStorage>,
}

impl SessionManager {
    pub fn new<S: SessionStorage + 'static>(storage: S) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    pub fn from_shared(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// Load the bag for `session_id`, or start a new session when the id is
    /// missing or unknown.
    pub async fn load(&self, session_id: Option<&str>) -> Result<LoadedSession> {
        if let Some(id) = session_id {
            match self.storage.load_session(id).await {
                Ok(bag) => {
                    return Ok(LoadedSession {
                        id: id.to_string(),
                        bag,
                        is_new: false,
                    })
                }
                Err(SessionError::NotFound) => {
                    tracing::debug!(session_id = id, "unknown session id, starting fresh");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(LoadedSession {
            id: Uuid::new_v4().to_string(),
            bag: SessionBag::new(),
            is_new: true,
        })
    }

    pub async fn save(&self, session_id: &str, bag: &SessionBag) -> Result<()> {
        self.storage.save_session(session_id, bag).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::ListRepository;
    use crate::storage::{FileSessionStorage, MemorySessionStorage};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_without_id_starts_new_session() {
        let manager = SessionManager::new(MemorySessionStorage::new());

        let session = manager.load(None).await.unwrap();
        assert!(session.is_new);
        assert!(session.bag.is_empty());
        assert!(Uuid::parse_str(&session.id).is_ok());
    }

    #[tokio::test]
    async fn test_load_unknown_id_gets_fresh_id() {
        let manager = SessionManager::new(MemorySessionStorage::new());

        let session = manager.load(Some("stale")).await.unwrap();
        assert!(session.is_new);
        assert_ne!(session.id, "stale");
    }

    #[tokio::test]
    async fn test_session_manager_persistence() {
        let dir = tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path());

        let session_id = {
            let manager = SessionManager::new(storage.clone());
            let mut session = manager.load(None).await.unwrap();
            ListRepository::new(&mut session.bag)
                .unwrap()
                .create_list("Groceries")
                .unwrap();
            manager.save(&session.id, &session.bag).await.unwrap();
            session.id
        };

        // A new manager over the same storage sees the saved lists
        let manager = SessionManager::new(storage);
        let mut session = manager.load(Some(session_id.as_str())).await.unwrap();
        assert!(!session.is_new);

        let repo = ListRepository::new(&mut session.bag).unwrap();
        assert_eq!(repo.lists().len(), 1);
        assert_eq!(repo.lists()[0].name, "Groceries");
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let manager = SessionManager::new(MemorySessionStorage::new());
        let mut first = manager.load(None).await.unwrap();
        manager.save(&first.id, &first.bag).await.unwrap();
        let mut second = manager.load(Some(first.id.as_str())).await.unwrap();

        ListRepository::new(&mut first.bag)
            .unwrap()
            .create_list("From first")
            .unwrap();
        ListRepository::new(&mut second.bag)
            .unwrap()
            .create_list("From second")
            .unwrap();
        manager.save(&first.id, &first.bag).await.unwrap();
        manager.save(&second.id, &second.bag).await.unwrap();

        let mut stored = manager.load(Some(first.id.as_str())).await.unwrap();
        let repo = ListRepository::new(&mut stored.bag).unwrap();
        assert_eq!(repo.lists().len(), 1);
        assert_eq!(repo.lists()[0].name, "From second");
    }

    #[tokio::test]
    async fn test_needs_saving() {
        let manager = SessionManager::new(MemorySessionStorage::new());

        let mut fresh = manager.load(None).await.unwrap();
        assert!(!fresh.needs_saving());
        ListRepository::new(&mut fresh.bag).unwrap();
        assert!(!fresh.needs_saving(), "seeded empty lists is not state");

        ListRepository::new(&mut fresh.bag)
            .unwrap()
            .set_error("The specified list was not found.")
            .unwrap();
        assert!(fresh.needs_saving());

        manager.save(&fresh.id, &SessionBag::new()).await.unwrap();
        let stored = manager.load(Some(fresh.id.as_str())).await.unwrap();
        assert!(stored.needs_saving(), "known sessions are always written back");
    }
}
