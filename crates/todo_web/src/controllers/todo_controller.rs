use actix_web::{
    post,
    web::{self, Data, Form, Path},
    HttpRequest, HttpResponse,
};
use log::{info, warn};
use serde::Deserialize;
use todo_session::{validate_todo_text, SessionError};

use super::{find_list, is_xhr, list_not_found, list_path, parse_id, redirect, TODO_NOT_FOUND};
use crate::dto::ListView;
use crate::error::Result;
use crate::server::AppState;
use crate::session::RequestSession;

#[derive(Debug, Deserialize)]
pub struct TodoForm {
    #[serde(default)]
    pub todo: String,
}

#[derive(Debug, Deserialize)]
pub struct TodoStatusForm {
    #[serde(default)]
    pub completed: String,
}

impl TodoStatusForm {
    /// Only the literal `"true"` marks a todo done; anything else reopens it.
    pub fn is_completed(&self) -> bool {
        self.completed == "true"
    }
}

/// POST /lists/{list_id}/todos
#[post("/lists/{list_id}/todos")]
pub async fn create_todo(
    req: HttpRequest,
    path: Path<String>,
    form: Form<TodoForm>,
    state: Data<AppState>,
) -> Result<HttpResponse> {
    let raw_list_id = path.into_inner();
    let text = form.into_inner().todo.trim().to_string();
    let mut session = RequestSession::load(&req, &state).await?;
    let response = {
        let mut repo = session.repository()?;
        let list = find_list(&repo, &raw_list_id);
        match list {
            None => list_not_found(&req, &mut repo, &raw_list_id)?,
            Some(list) => match validate_todo_text(&text) {
                Ok(()) => {
                    let todo_id = repo.create_todo(list.id, text)?;
                    info!("Added todo {} to list {}", todo_id, list.id);
                    repo.set_success("The todo was added.")?;
                    redirect(&list_path(list.id))
                }
                Err(e) => {
                    repo.set_error(e.to_string())?;
                    HttpResponse::UnprocessableEntity().json(ListView {
                        list,
                        todo: Some(text),
                        notices: repo.take_notices().into(),
                    })
                }
            },
        }
    };
    session.commit(&state, response).await
}

/// POST /lists/{list_id}/todos/{id}/destroy
///
/// Script-driven deletes answer 204 and leave no notice behind.
#[post("/lists/{list_id}/todos/{id}/destroy")]
pub async fn destroy_todo(
    req: HttpRequest,
    path: Path<(String, String)>,
    state: Data<AppState>,
) -> Result<HttpResponse> {
    let (raw_list_id, raw_todo_id) = path.into_inner();
    let mut session = RequestSession::load(&req, &state).await?;
    let response = {
        let mut repo = session.repository()?;
        if let (Some(list_id), Some(todo_id)) = (parse_id(&raw_list_id), parse_id(&raw_todo_id)) {
            if repo.delete_todo(list_id, todo_id)? {
                info!("Deleted todo {} from list {}", todo_id, list_id);
            }
        }

        if is_xhr(&req) {
            HttpResponse::NoContent().finish()
        } else {
            repo.set_success("The todo has been deleted.")?;
            let location = parse_id(&raw_list_id)
                .map(list_path)
                .unwrap_or_else(|| "/lists".to_string());
            redirect(&location)
        }
    };
    session.commit(&state, response).await
}

/// POST /lists/{list_id}/todos/{id}
#[post("/lists/{list_id}/todos/{id}")]
pub async fn update_todo(
    req: HttpRequest,
    path: Path<(String, String)>,
    form: Form<TodoStatusForm>,
    state: Data<AppState>,
) -> Result<HttpResponse> {
    let (raw_list_id, raw_todo_id) = path.into_inner();
    let completed = form.is_completed();
    let mut session = RequestSession::load(&req, &state).await?;
    let response = {
        let mut repo = session.repository()?;
        let outcome = match (parse_id(&raw_list_id), parse_id(&raw_todo_id)) {
            (Some(list_id), Some(todo_id)) => repo
                .update_todo(list_id, todo_id, completed)
                .map(|()| list_id),
            (Some(list_id), None) if repo.get_list(list_id).is_some() => {
                Err(SessionError::TodoNotFound { list_id, todo_id: 0 })
            }
            (Some(list_id), None) => Err(SessionError::ListNotFound(list_id)),
            (None, _) => Err(SessionError::ListNotFound(0)),
        };
        match outcome {
            Ok(list_id) => {
                repo.set_success("The todo has been updated.")?;
                redirect(&list_path(list_id))
            }
            Err(SessionError::ListNotFound(_)) => list_not_found(&req, &mut repo, &raw_list_id)?,
            Err(SessionError::TodoNotFound { list_id, .. }) => {
                warn!("todo '{}' not found in list {}", raw_todo_id, list_id);
                repo.set_error(TODO_NOT_FOUND)?;
                redirect(&list_path(list_id))
            }
            Err(e) => return Err(e.into()),
        }
    };
    session.commit(&state, response).await
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(create_todo)
        .service(destroy_todo)
        .service(update_todo);
}
