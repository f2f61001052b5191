pub mod list_controller;
pub mod todo_controller;

use actix_web::{http::header, HttpRequest, HttpResponse};
use log::warn;
use todo_session::ListRepository;

use crate::dto::ListDetailDTO;
use crate::error::Result;
use crate::middleware::tracing_middleware::extract_request_id;

pub const LIST_NOT_FOUND: &str = "The specified list was not found.";
pub const TODO_NOT_FOUND: &str = "The specified todo was not found.";

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub(crate) fn list_path(list_id: u64) -> String {
    format!("/lists/{list_id}")
}

/// Ids that do not parse never match a list.
pub(crate) fn parse_id(raw: &str) -> Option<u64> {
    raw.trim().parse().ok()
}

/// Look up a list by its raw path segment.
pub(crate) fn find_list(repo: &ListRepository<'_>, raw_id: &str) -> Option<ListDetailDTO> {
    parse_id(raw_id)
        .and_then(|id| repo.get_list(id))
        .map(ListDetailDTO::from)
}

/// Requests sent by the page's own scripts rather than a form submit.
pub(crate) fn is_xhr(req: &HttpRequest) -> bool {
    req.headers()
        .get("X-Requested-With")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "XMLHttpRequest")
}

/// Flag a missing list and send the user back to the index.
pub(crate) fn list_not_found(
    req: &HttpRequest,
    repo: &mut ListRepository<'_>,
    raw_id: &str,
) -> Result<HttpResponse> {
    warn!(
        "[{}] list '{}' not found",
        extract_request_id(req).unwrap_or_default(),
        raw_id
    );
    repo.set_error(LIST_NOT_FOUND)?;
    Ok(redirect("/lists"))
}
