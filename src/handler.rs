use crate::routes::Route;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_macros::debug_handler;
use serde_json::Value;
use std::path::{Component, PathBuf};
use tracing::{debug, error};

/// The fixed passthrough route pattern; the registrar reserves it so no mock
/// route can conflict with it.
pub const JSON_FILE_ROUTE: &str = "/json/:filename";

#[derive(Clone)]
pub struct RouteHandler {
    pub route: Route,
}

#[debug_handler]
/// The handler function for every registered mock endpoint.
/// Each endpoint uses the same handler function but a different state carrying
/// the canned response it serves; the actual request content is ignored.
pub async fn mock_response(State(state): State<RouteHandler>) -> impl IntoResponse {
    debug!("Serving canned response for {}", state.route.endpoint);
    // from_value already verified the status, so the fallback never fires
    let status = StatusCode::from_u16(state.route.response.status)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(state.route.response.body.clone()))
}

#[debug_handler]
/// Serves the parsed contents of a file beneath the JSON directory.
/// Filenames that are anything other than a single path component are
/// answered with the same 404 as a missing file, so requests cannot escape
/// the base directory.
pub async fn json_file(
    State(base_dir): State<PathBuf>,
    Path(filename): Path<String>,
) -> Response {
    if !is_plain_filename(&filename) {
        return (StatusCode::NOT_FOUND, "File not found").into_response();
    }

    match tokio::fs::read_to_string(base_dir.join(&filename)).await {
        Ok(contents) => match serde_json::from_str::<Value>(&contents) {
            Ok(json) => (StatusCode::OK, Json(json)).into_response(),
            Err(e) => {
                error!("Invalid JSON in file {}: {}", filename, e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Invalid JSON file").into_response()
            }
        },
        Err(_) => (StatusCode::NOT_FOUND, "File not found").into_response(),
    }
}

fn is_plain_filename(filename: &str) -> bool {
    let mut components = std::path::Path::new(filename).components();
    matches!(components.next(), Some(Component::Normal(_))) && components.next().is_none()
}
