//! View models handed to the rendering layer.
//!
//! Handlers never emit markup. Every page is a JSON document shaped for the
//! template that renders it; lists and todos arrive already in display order.
use serde::Serialize;
use todo_session::{sort_lists, sort_todos, List, Notices, Todo};

/// One-shot notices shown on the rendered page
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticesDTO {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
}

impl From<Notices> for NoticesDTO {
    fn from(notices: Notices) -> Self {
        Self {
            error: notices.error,
            success: notices.success,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct TodoDTO {
    pub id: u64,
    pub name: String,
    pub completed: bool,
}

impl From<&Todo> for TodoDTO {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id,
            name: todo.name.clone(),
            completed: todo.completed,
        }
    }
}

/// Row on the list index
#[derive(Serialize, Debug, Clone)]
pub struct ListSummaryDTO {
    pub id: u64,
    pub name: String,
    pub todos_count: usize,
    pub todos_remaining_count: usize,
    pub complete: bool,
    pub class: Option<String>,
}

impl From<&List> for ListSummaryDTO {
    fn from(list: &List) -> Self {
        Self {
            id: list.id,
            name: list.name.clone(),
            todos_count: list.todos_count(),
            todos_remaining_count: list.todos_remaining_count(),
            complete: list.is_complete(),
            class: list.css_class().map(str::to_string),
        }
    }
}

/// A list with its todos, open todos first
#[derive(Serialize, Debug, Clone)]
pub struct ListDetailDTO {
    pub id: u64,
    pub name: String,
    pub complete: bool,
    pub class: Option<String>,
    pub todos_count: usize,
    pub todos_remaining_count: usize,
    pub todos: Vec<TodoDTO>,
}

impl From<&List> for ListDetailDTO {
    fn from(list: &List) -> Self {
        Self {
            id: list.id,
            name: list.name.clone(),
            complete: list.is_complete(),
            class: list.css_class().map(str::to_string),
            todos_count: list.todos_count(),
            todos_remaining_count: list.todos_remaining_count(),
            todos: sort_todos(&list.todos).into_iter().map(TodoDTO::from).collect(),
        }
    }
}

/// GET /lists
#[derive(Serialize, Debug, Clone)]
pub struct ListIndexView {
    pub lists: Vec<ListSummaryDTO>,
    #[serde(flatten)]
    pub notices: NoticesDTO,
}

impl ListIndexView {
    pub fn new(lists: &[List], notices: Notices) -> Self {
        Self {
            lists: sort_lists(lists)
                .into_iter()
                .map(ListSummaryDTO::from)
                .collect(),
            notices: notices.into(),
        }
    }
}

/// New-list and edit-list forms. `list_name` echoes the user's input.
#[derive(Serialize, Debug, Clone)]
pub struct ListFormView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<ListDetailDTO>,
    pub list_name: String,
    #[serde(flatten)]
    pub notices: NoticesDTO,
}

/// GET /lists/{id}. `todo` echoes rejected todo input.
#[derive(Serialize, Debug, Clone)]
pub struct ListView {
    pub list: ListDetailDTO,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub todo: Option<String>,
    #[serde(flatten)]
    pub notices: NoticesDTO,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_view_orders_and_flattens_notices() {
        let mut done = List::new(1, "Done");
        done.todos.push(Todo {
            id: 1,
            name: "x".into(),
            completed: true,
        });
        let open = List::new(2, "Open");

        let view = ListIndexView::new(
            &[done, open],
            Notices {
                error: None,
                success: Some("ok".into()),
            },
        );
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["lists"][0]["name"], "Open");
        assert_eq!(json["lists"][1]["class"], "complete");
        assert_eq!(json["success"], "ok");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_list_detail_puts_completed_todos_last() {
        let mut list = List::new(1, "Chores");
        list.todos = vec![
            Todo {
                id: 1,
                name: "dishes".into(),
                completed: true,
            },
            Todo::new(2, "laundry"),
        ];

        let dto = ListDetailDTO::from(&list);
        assert_eq!(dto.todos[0].name, "laundry");
        assert_eq!(dto.todos[1].name, "dishes");
        assert_eq!(dto.todos_remaining_count, 1);
        assert!(!dto.complete);
    }
}
