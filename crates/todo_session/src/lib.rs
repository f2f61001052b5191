//! # Todo Session
//!
//! Session-backed todo lists. Everything a user owns lives inside an opaque
//! per-session key-value bag; this crate provides the typed model on top of
//! that bag, the list repository, input validation and the storage backends
//! that keep bags alive between requests.

pub mod error;
pub mod manager;
pub mod repository;
pub mod storage;
pub mod structs;
pub mod validation;

// Re-exports
pub use error::{SessionError, ValidationError};
pub use manager::{LoadedSession, SessionManager};
pub use repository::{next_id, ListRepository, Notices};
pub use storage::{
    FileSessionStorage, MemorySessionStorage, SessionStorage, DEFAULT_SESSION_CAPACITY,
};
pub use structs::{sort_lists, sort_todos, Identified, List, SessionBag, Todo};
pub use validation::{validate_list_name, validate_todo_text};
