//! Session data structures

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque per-session key-value bag.
///
/// This is the only persistence substrate: the web layer loads one bag per
/// request, hands it to a [`crate::ListRepository`] and stores it again before
/// responding. Values are kept as raw JSON; typed access goes through
/// [`SessionBag::get`] and [`SessionBag::insert`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionBag {
    entries: Map<String, Value>,
}

impl SessionBag {
    /// Create an empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the value stored under `key`, if any.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.entries.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// Encode `value` and store it under `key`, replacing any previous value.
    pub fn insert<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    /// Remove the value under `key` and return it if it was a string.
    pub fn take_string(&mut self, key: &str) -> Option<String> {
        match self.entries.remove(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Anything that carries a collection-scoped numeric id.
pub trait Identified {
    fn id(&self) -> u64;
}

/// A named todo list owned by one session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct List {
    /// Unique within the session
    pub id: u64,

    /// Display name, unique among the session's lists
    pub name: String,

    /// Todos in insertion order
    #[serde(default)]
    pub todos: Vec<Todo>,
}

/// A single task inside a list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    /// Unique within the owning list
    pub id: u64,

    pub name: String,

    #[serde(default)]
    pub completed: bool,
}

impl Identified for List {
    fn id(&self) -> u64 {
        self.id
    }
}

impl Identified for Todo {
    fn id(&self) -> u64 {
        self.id
    }
}

impl List {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            todos: Vec::new(),
        }
    }

    pub fn todos_count(&self) -> usize {
        self.todos.len()
    }

    pub fn todos_remaining_count(&self) -> usize {
        self.todos.iter().filter(|todo| !todo.completed).count()
    }

    /// A list is complete once it has todos and none of them are open.
    /// An empty list is never complete.
    pub fn is_complete(&self) -> bool {
        self.todos_count() > 0 && self.todos_remaining_count() == 0
    }

    /// CSS class a view should attach to this list
    pub fn css_class(&self) -> Option<&'static str> {
        if self.is_complete() {
            Some("complete")
        } else {
            None
        }
    }
}

impl Todo {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            completed: false,
        }
    }
}

/// Display order for lists: incomplete lists first, then complete ones.
/// Order within each group is preserved.
pub fn sort_lists(lists: &[List]) -> Vec<&List> {
    let (complete, mut incomplete): (Vec<&List>, Vec<&List>) =
        lists.iter().partition(|list| list.is_complete());
    incomplete.extend(complete);
    incomplete
}

/// Display order for todos: open todos first, then completed ones.
pub fn sort_todos(todos: &[Todo]) -> Vec<&Todo> {
    let (completed, mut open): (Vec<&Todo>, Vec<&Todo>) =
        todos.iter().partition(|todo| todo.completed);
    open.extend(completed);
    open
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: u64, completed: bool) -> Todo {
        Todo {
            id,
            name: format!("todo {id}"),
            completed,
        }
    }

    #[test]
    fn test_bag_insert_and_get() {
        let mut bag = SessionBag::new();
        bag.insert("lists", &vec![List::new(1, "Groceries")]).unwrap();

        let lists: Vec<List> = bag.get("lists").unwrap().unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].name, "Groceries");
        assert!(bag.get::<Vec<List>>("missing").unwrap().is_none());
    }

    #[test]
    fn test_bag_get_with_wrong_shape_fails() {
        let mut bag = SessionBag::new();
        bag.insert("lists", "not a list").unwrap();

        assert!(bag.get::<Vec<List>>("lists").is_err());
    }

    #[test]
    fn test_bag_take_string_is_one_shot() {
        let mut bag = SessionBag::new();
        bag.insert("error", "boom").unwrap();

        assert_eq!(bag.take_string("error").as_deref(), Some("boom"));
        assert_eq!(bag.take_string("error"), None);
        assert!(bag.is_empty());
    }

    #[test]
    fn test_empty_list_is_not_complete() {
        let list = List::new(1, "Empty");
        assert!(!list.is_complete());
        assert_eq!(list.css_class(), None);
    }

    #[test]
    fn test_list_completion_counts() {
        let mut list = List::new(1, "Chores");
        list.todos = vec![todo(1, true), todo(2, false)];

        assert_eq!(list.todos_count(), 2);
        assert_eq!(list.todos_remaining_count(), 1);
        assert!(!list.is_complete());

        list.todos[1].completed = true;
        assert!(list.is_complete());
        assert_eq!(list.css_class(), Some("complete"));
    }

    #[test]
    fn test_sort_lists_puts_complete_last() {
        let mut done = List::new(1, "Done");
        done.todos = vec![todo(1, true)];
        let open = List::new(2, "Open");
        let mut half = List::new(3, "Half");
        half.todos = vec![todo(1, true), todo(2, false)];

        let lists = vec![done, open, half];
        let names: Vec<&str> = sort_lists(&lists).iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Open", "Half", "Done"]);
    }

    #[test]
    fn test_sort_todos_puts_completed_last() {
        let todos = vec![todo(1, true), todo(2, false), todo(3, true), todo(4, false)];
        let ids: Vec<u64> = sort_todos(&todos).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_serialization() {
        let mut bag = SessionBag::new();
        let mut list = List::new(4, "Work");
        list.todos.push(Todo::new(1, "ship it"));
        bag.insert("lists", &vec![list.clone()]).unwrap();
        bag.insert("success", "The list has been created.").unwrap();

        let json = serde_json::to_string(&bag).unwrap();
        let deserialized: SessionBag = serde_json::from_str(&json).unwrap();

        assert_eq!(bag, deserialized);
        let lists: Vec<List> = deserialized.get("lists").unwrap().unwrap();
        assert_eq!(lists[0], list);
    }
}
