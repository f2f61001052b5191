use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Middleware that wraps each request in a span tagged with a request id.
///
/// The id is taken from an incoming `X-Request-Id` header or generated, and
/// echoed back on the response. The span also records whether the request
/// carried a session cookie; completion is logged at a level matching the
/// status class.
pub struct TracingMiddleware {
    session_cookie: Rc<str>,
}

impl TracingMiddleware {
    pub fn new(session_cookie: &str) -> Self {
        Self {
            session_cookie: Rc::from(session_cookie),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for TracingMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TracingMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TracingMiddlewareService {
            service: Rc::new(service),
            session_cookie: Rc::clone(&self.session_cookie),
        }))
    }
}

pub struct TracingMiddlewareService<S> {
    service: Rc<S>,
    session_cookie: Rc<str>,
}

impl<S, B> Service<ServiceRequest> for TracingMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request_id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        req.extensions_mut().insert(RequestId(request_id.clone()));

        let span = tracing::info_span!(
            "http_request",
            request_id = %request_id,
            method = %req.method(),
            path = %req.path(),
            has_session = req.cookie(&self.session_cookie).is_some(),
        );
        let service = Rc::clone(&self.service);

        Box::pin(
            async move {
                let started = Instant::now();
                let mut res = match service.call(req).await {
                    Ok(res) => res,
                    Err(e) => {
                        tracing::error!(error = %e, "Request errored before a response");
                        return Err(e);
                    }
                };

                if let Ok(value) = HeaderValue::from_str(&request_id) {
                    res.headers_mut()
                        .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
                }

                let status = res.status().as_u16();
                let elapsed_ms = started.elapsed().as_millis() as u64;
                if res.status().is_server_error() {
                    tracing::error!(status, elapsed_ms, "Request failed");
                } else if res.status().is_client_error() {
                    tracing::warn!(status, elapsed_ms, "Request rejected");
                } else {
                    tracing::info!(status, elapsed_ms, "Request completed");
                }

                Ok(res)
            }
            .instrument(span),
        )
    }
}

/// Request id stored in request extensions
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Request id assigned by [`TracingMiddleware`], if it ran
pub fn extract_request_id(req: &actix_web::HttpRequest) -> Option<String> {
    req.extensions().get::<RequestId>().map(|id| id.0.clone())
}
