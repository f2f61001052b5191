use actix_web::{
    get, post,
    web::{self, Data, Form, Path},
    HttpRequest, HttpResponse,
};
use log::info;
use serde::Deserialize;
use todo_session::{validate_list_name, SessionError};

use super::{find_list, is_xhr, list_not_found, list_path, parse_id, redirect};
use crate::dto::{ListFormView, ListIndexView, ListView};
use crate::error::Result;
use crate::server::AppState;
use crate::session::RequestSession;

#[derive(Debug, Deserialize)]
pub struct ListNameForm {
    #[serde(default)]
    pub list_name: String,
}

#[get("/")]
pub async fn root() -> HttpResponse {
    redirect("/lists")
}

/// GET /lists
#[get("/lists")]
pub async fn index(req: HttpRequest, state: Data<AppState>) -> Result<HttpResponse> {
    let mut session = RequestSession::load(&req, &state).await?;
    let response = {
        let mut repo = session.repository()?;
        let notices = repo.take_notices();
        HttpResponse::Ok().json(ListIndexView::new(repo.lists(), notices))
    };
    session.commit(&state, response).await
}

/// GET /lists/new
#[get("/lists/new")]
pub async fn new_list(req: HttpRequest, state: Data<AppState>) -> Result<HttpResponse> {
    let mut session = RequestSession::load(&req, &state).await?;
    let response = {
        let mut repo = session.repository()?;
        HttpResponse::Ok().json(ListFormView {
            list: None,
            list_name: String::new(),
            notices: repo.take_notices().into(),
        })
    };
    session.commit(&state, response).await
}

/// POST /lists
#[post("/lists")]
pub async fn create_list(
    req: HttpRequest,
    form: Form<ListNameForm>,
    state: Data<AppState>,
) -> Result<HttpResponse> {
    let list_name = form.into_inner().list_name.trim().to_string();
    let mut session = RequestSession::load(&req, &state).await?;
    let session_id = session.id().to_string();
    let response = {
        let mut repo = session.repository()?;
        match validate_list_name(&list_name, repo.lists()) {
            Ok(()) => {
                let id = repo.create_list(list_name)?;
                info!("Created list {} in session {}", id, session_id);
                repo.set_success("The list has been created.")?;
                redirect("/lists")
            }
            Err(e) => {
                repo.set_error(e.to_string())?;
                HttpResponse::UnprocessableEntity().json(ListFormView {
                    list: None,
                    list_name,
                    notices: repo.take_notices().into(),
                })
            }
        }
    };
    session.commit(&state, response).await
}

/// GET /lists/{id}
#[get("/lists/{id}")]
pub async fn show_list(
    req: HttpRequest,
    path: Path<String>,
    state: Data<AppState>,
) -> Result<HttpResponse> {
    let raw_id = path.into_inner();
    let mut session = RequestSession::load(&req, &state).await?;
    let response = {
        let mut repo = session.repository()?;
        let list = find_list(&repo, &raw_id);
        match list {
            Some(list) => HttpResponse::Ok().json(ListView {
                list,
                todo: None,
                notices: repo.take_notices().into(),
            }),
            None => list_not_found(&req, &mut repo, &raw_id)?,
        }
    };
    session.commit(&state, response).await
}

/// GET /lists/{id}/edit
#[get("/lists/{id}/edit")]
pub async fn edit_list(
    req: HttpRequest,
    path: Path<String>,
    state: Data<AppState>,
) -> Result<HttpResponse> {
    let raw_id = path.into_inner();
    let mut session = RequestSession::load(&req, &state).await?;
    let response = {
        let mut repo = session.repository()?;
        let list = find_list(&repo, &raw_id);
        match list {
            Some(list) => {
                let list_name = list.name.clone();
                HttpResponse::Ok().json(ListFormView {
                    list: Some(list),
                    list_name,
                    notices: repo.take_notices().into(),
                })
            }
            None => list_not_found(&req, &mut repo, &raw_id)?,
        }
    };
    session.commit(&state, response).await
}

/// POST /lists/{id}
#[post("/lists/{id}")]
pub async fn update_list(
    req: HttpRequest,
    path: Path<String>,
    form: Form<ListNameForm>,
    state: Data<AppState>,
) -> Result<HttpResponse> {
    let raw_id = path.into_inner();
    let list_name = form.into_inner().list_name.trim().to_string();
    let mut session = RequestSession::load(&req, &state).await?;
    let response = {
        let mut repo = session.repository()?;
        let list = find_list(&repo, &raw_id);
        match list {
            None => list_not_found(&req, &mut repo, &raw_id)?,
            Some(list) => match validate_list_name(&list_name, repo.lists()) {
                Ok(()) => {
                    repo.change_list_name(list.id, list_name)?;
                    repo.set_success("The list has been updated.")?;
                    redirect(&list_path(list.id))
                }
                Err(e) => {
                    repo.set_error(e.to_string())?;
                    HttpResponse::UnprocessableEntity().json(ListFormView {
                        list: Some(list),
                        list_name,
                        notices: repo.take_notices().into(),
                    })
                }
            },
        }
    };
    session.commit(&state, response).await
}

/// POST /lists/{id}/destroy
///
/// Script-driven requests get the index path back as a plain body so the
/// page can navigate itself.
#[post("/lists/{id}/destroy")]
pub async fn destroy_list(
    req: HttpRequest,
    path: Path<String>,
    state: Data<AppState>,
) -> Result<HttpResponse> {
    let raw_id = path.into_inner();
    let mut session = RequestSession::load(&req, &state).await?;
    let response = {
        let mut repo = session.repository()?;
        if let Some(id) = parse_id(&raw_id) {
            if repo.delete_list(id)? {
                info!("Deleted list {}", id);
            }
        }
        repo.set_success("The list has been deleted.")?;

        if is_xhr(&req) {
            HttpResponse::Ok()
                .content_type("text/plain; charset=utf-8")
                .body("/lists")
        } else {
            redirect("/lists")
        }
    };
    session.commit(&state, response).await
}

/// POST /lists/{id}/complete_all
#[post("/lists/{id}/complete_all")]
pub async fn complete_all(
    req: HttpRequest,
    path: Path<String>,
    state: Data<AppState>,
) -> Result<HttpResponse> {
    let raw_id = path.into_inner();
    let mut session = RequestSession::load(&req, &state).await?;
    let response = {
        let mut repo = session.repository()?;
        let outcome = parse_id(&raw_id).map(|id| (id, repo.complete_all_todos(id)));
        match outcome {
            Some((id, Ok(()))) => {
                repo.set_success("All todos have been completed.")?;
                redirect(&list_path(id))
            }
            None | Some((_, Err(SessionError::ListNotFound(_)))) => {
                list_not_found(&req, &mut repo, &raw_id)?
            }
            Some((_, Err(e))) => return Err(e.into()),
        }
    };
    session.commit(&state, response).await
}

pub fn config(cfg: &mut web::ServiceConfig) {
    // `/lists/new` must be registered ahead of `/lists/{id}`
    cfg.service(root)
        .service(index)
        .service(new_list)
        .service(create_list)
        .service(show_list)
        .service(edit_list)
        .service(update_list)
        .service(destroy_list)
        .service(complete_all);
}
