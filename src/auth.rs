use axum::extract::{Request, State};
use axum::http::{header::AUTHORIZATION, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
/// The API key allow-list, loaded once at startup and handed to the gate
/// explicitly so tests can inject their own key sets.
pub struct ApiKeys(Arc<Vec<String>>);

impl ApiKeys {
    pub fn new(keys: Vec<String>) -> Self {
        Self(Arc::new(keys))
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|key| key == token)
    }
}

/// The authentication gate layered over every dynamic route.
/// The token is the raw `Authorization` header value, no scheme prefix; it
/// must match a configured key exactly or the request is answered with 401
/// before any downstream handler runs.
pub async fn require_api_key(
    State(keys): State<ApiKeys>,
    request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match token {
        Some(token) if keys.contains(token) => next.run(request).await,
        _ => {
            debug!("Rejecting request to {} without a valid key", request.uri());
            (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
        }
    }
}
