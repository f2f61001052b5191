//! Per-request session handling.
//!
//! A request loads its bag from the session cookie, works on it through a
//! [`ListRepository`] and commits it back to storage just before the response
//! leaves. New sessions get their cookie set on that response, unless they
//! ended the request with nothing worth storing.

use actix_web::cookie::{Cookie, SameSite};
use actix_web::{HttpRequest, HttpResponse};
use todo_session::{ListRepository, LoadedSession};

use crate::error::{AppError, Result};
use crate::server::AppState;

pub struct RequestSession {
    inner: LoadedSession,
}

impl RequestSession {
    pub async fn load(req: &HttpRequest, state: &AppState) -> Result<Self> {
        let cookie = req.cookie(&state.config.session_cookie);
        let session_id = cookie.as_ref().map(|c| c.value());
        let inner = state.sessions.load(session_id).await?;
        Ok(Self { inner })
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn repository(&mut self) -> Result<ListRepository<'_>> {
        Ok(ListRepository::new(&mut self.inner.bag)?)
    }

    /// Persist the bag and attach the session cookie when the session is new.
    pub async fn commit(self, state: &AppState, mut response: HttpResponse) -> Result<HttpResponse> {
        if !self.inner.needs_saving() {
            return Ok(response);
        }

        state.sessions.save(&self.inner.id, &self.inner.bag).await?;

        if self.inner.is_new {
            let cookie = Cookie::build(state.config.session_cookie.clone(), self.inner.id.clone())
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .finish();
            response.add_cookie(&cookie).map_err(|e| {
                AppError::InternalError(anyhow::anyhow!("failed to set session cookie: {e}"))
            })?;
        }

        Ok(response)
    }
}
