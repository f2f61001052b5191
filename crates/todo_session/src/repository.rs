//! List repository over a session bag.
//!
//! The repository borrows the caller's [`SessionBag`] for the duration of a
//! request. It decodes the `lists` key once, operates on the typed copy and
//! writes the whole collection back to the bag after every mutation, so the
//! bag is always current when the caller hands it to storage.

use crate::error::{Result, SessionError};
use crate::structs::{Identified, List, SessionBag, Todo};
use tracing::debug;

pub const LISTS_KEY: &str = "lists";
pub const ERROR_KEY: &str = "error";
pub const SUCCESS_KEY: &str = "success";

/// Next free id in a collection: one past the largest id, or 1 when empty.
///
/// Scoped to the collection passed in; list ids and each list's todo ids are
/// numbered independently.
pub fn next_id<T: Identified>(items: &[T]) -> u64 {
    items.iter().map(Identified::id).max().unwrap_or(0) + 1
}

/// True when `bag` holds nothing but an empty (or absent) `lists` collection.
pub fn is_blank(bag: &SessionBag) -> bool {
    match bag.get::<Vec<List>>(LISTS_KEY) {
        Ok(Some(lists)) => lists.is_empty() && bag.len() == 1,
        Ok(None) => bag.is_empty(),
        Err(_) => false,
    }
}

/// One-shot user notices pulled out of the bag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notices {
    pub error: Option<String>,
    pub success: Option<String>,
}

pub struct ListRepository<'a> {
    bag: &'a mut SessionBag,
    lists: Vec<List>,
}

impl<'a> ListRepository<'a> {
    /// Wrap `bag`, seeding an empty `lists` collection if none is present.
    /// Existing lists are left untouched.
    pub fn new(bag: &'a mut SessionBag) -> Result<Self> {
        let lists = match bag.get::<Vec<List>>(LISTS_KEY) {
            Ok(Some(lists)) => lists,
            Ok(None) => {
                bag.insert(LISTS_KEY, &Vec::<List>::new())?;
                Vec::new()
            }
            Err(e) => {
                return Err(SessionError::InvalidData(format!(
                    "unreadable '{LISTS_KEY}' entry: {e}"
                )))
            }
        };
        Ok(Self { bag, lists })
    }

    pub fn lists(&self) -> &[List] {
        &self.lists
    }

    pub fn get_list(&self, id: u64) -> Option<&List> {
        self.lists.iter().find(|list| list.id == id)
    }

    pub fn list_name_taken(&self, name: &str) -> bool {
        self.lists.iter().any(|list| list.name == name)
    }

    /// Append a new, empty list and return its id.
    pub fn create_list(&mut self, name: impl Into<String>) -> Result<u64> {
        let id = next_id(&self.lists);
        self.lists.push(List::new(id, name));
        debug!(list_id = id, "list created");
        self.flush()?;
        Ok(id)
    }

    /// Append an open todo to list `list_id` and return the todo's id.
    pub fn create_todo(&mut self, list_id: u64, text: impl Into<String>) -> Result<u64> {
        let list = self.list_mut(list_id)?;
        let id = next_id(&list.todos);
        list.todos.push(Todo::new(id, text));
        debug!(list_id, todo_id = id, "todo created");
        self.flush()?;
        Ok(id)
    }

    pub fn change_list_name(&mut self, list_id: u64, new_name: impl Into<String>) -> Result<()> {
        self.list_mut(list_id)?.name = new_name.into();
        self.flush()
    }

    /// Remove list `id`. Returns false when there was nothing to remove.
    pub fn delete_list(&mut self, id: u64) -> Result<bool> {
        let before = self.lists.len();
        self.lists.retain(|list| list.id != id);
        if self.lists.len() == before {
            return Ok(false);
        }
        self.flush()?;
        Ok(true)
    }

    /// Remove a todo. Missing list or todo is a no-op.
    pub fn delete_todo(&mut self, list_id: u64, todo_id: u64) -> Result<bool> {
        let Some(list) = self.lists.iter_mut().find(|list| list.id == list_id) else {
            return Ok(false);
        };
        let before = list.todos.len();
        list.todos.retain(|todo| todo.id != todo_id);
        if list.todos.len() == before {
            return Ok(false);
        }
        self.flush()?;
        Ok(true)
    }

    pub fn update_todo(&mut self, list_id: u64, todo_id: u64, completed: bool) -> Result<()> {
        let list = self.list_mut(list_id)?;
        let todo = list
            .todos
            .iter_mut()
            .find(|todo| todo.id == todo_id)
            .ok_or(SessionError::TodoNotFound { list_id, todo_id })?;
        todo.completed = completed;
        self.flush()
    }

    pub fn complete_all_todos(&mut self, list_id: u64) -> Result<()> {
        let list = self.list_mut(list_id)?;
        for todo in &mut list.todos {
            todo.completed = true;
        }
        self.flush()
    }

    pub fn set_error(&mut self, message: impl AsRef<str>) -> Result<()> {
        self.bag.insert(ERROR_KEY, message.as_ref())
    }

    pub fn set_success(&mut self, message: impl AsRef<str>) -> Result<()> {
        self.bag.insert(SUCCESS_KEY, message.as_ref())
    }

    /// Remove pending notices from the bag and hand them to the caller.
    pub fn take_notices(&mut self) -> Notices {
        Notices {
            error: self.bag.take_string(ERROR_KEY),
            success: self.bag.take_string(SUCCESS_KEY),
        }
    }

    fn list_mut(&mut self, list_id: u64) -> Result<&mut List> {
        self.lists
            .iter_mut()
            .find(|list| list.id == list_id)
            .ok_or(SessionError::ListNotFound(list_id))
    }

    fn flush(&mut self) -> Result<()> {
        self.bag.insert(LISTS_KEY, &self.lists)
    }
}
