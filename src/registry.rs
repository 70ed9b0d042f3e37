use crate::handler::{mock_response, RouteHandler, JSON_FILE_ROUTE};
use crate::routes::{HttpMethod, Route};
use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{error, warn};

/// Reads every route definition file in `dir` and returns the accepted routes
/// per file. Files are processed in name order so registration order is
/// deterministic. A file that cannot be read or parsed as a JSON array is
/// skipped whole; a malformed element is skipped alone and its siblings still
/// load. Every skip is reported with the offending file, none is fatal.
pub fn load_route_files(dir: &Path) -> Vec<(PathBuf, Vec<Route>)> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            error!("Unable to scan directory {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    let mut loaded = Vec::new();
    for path in files {
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                error!("Unable to read file {}: {}", path.display(), e);
                continue;
            }
        };

        let parsed: Value = match serde_json::from_str(&contents) {
            Ok(parsed) => parsed,
            Err(_) => {
                error!("Invalid JSON format in file: {}", path.display());
                continue;
            }
        };
        let Some(raw_routes) = parsed.as_array() else {
            error!("Expected a JSON array of routes in file: {}", path.display());
            continue;
        };

        let mut routes = Vec::new();
        for raw in raw_routes {
            match Route::from_value(raw) {
                Some(route) => routes.push(route),
                None => error!("Invalid route format in file: {}", path.display()),
            }
        }
        loaded.push((path, routes));
    }
    loaded
}

/// Records the path shapes already handed to the router. axum panics on any
/// matchit conflict, not just exact duplicates, so shapes are vetted here
/// first: capture segments are compared by position (`/users/:id` and
/// `/users/:name` are the same shape) and a capture name must stay consistent
/// across every route sharing its prefix. The passthrough pattern is reserved
/// up front so no mock route can collide with it.
struct PathClaims {
    seen: HashSet<(HttpMethod, String)>,
    captures: HashMap<String, String>,
}

fn segment_shape(segment: &str) -> &str {
    // Wildcards get the same shape as captures; matchit rejects either kind
    // next to the other at the same position.
    if segment.starts_with(':') || segment.starts_with('*') {
        ":"
    } else {
        segment
    }
}

fn normalize_path(path: &str) -> String {
    let mut normalized = String::new();
    for segment in path.split('/').skip(1) {
        normalized.push('/');
        normalized.push_str(segment_shape(segment));
    }
    normalized
}

impl PathClaims {
    fn new() -> Self {
        let mut claims = Self {
            seen: HashSet::new(),
            captures: HashMap::new(),
        };
        claims.claim(HttpMethod::GET, JSON_FILE_ROUTE);
        claims
    }

    /// Returns false when registering the endpoint would conflict with an
    /// earlier claim; the first claim always wins.
    fn claim(&mut self, method: HttpMethod, endpoint: &str) -> bool {
        let normalized = normalize_path(endpoint);
        if self.seen.contains(&(method, normalized.clone())) {
            return false;
        }

        let mut prefix = String::new();
        let mut pending: Vec<(String, String)> = Vec::new();
        for segment in endpoint.split('/').skip(1) {
            let shape = segment_shape(segment);
            prefix.push('/');
            prefix.push_str(shape);
            if shape == ":" {
                match self.captures.get(&prefix) {
                    Some(existing) if existing != segment => return false,
                    Some(_) => {}
                    None => pending.push((prefix.clone(), segment.to_string())),
                }
            }
        }

        self.captures.extend(pending);
        self.seen.insert((method, normalized));
        true
    }
}

/// Builds the router for the dynamic mock endpoints. Dispatch is an explicit
/// match on the verb enum. Every endpoint is vetted against the claims table
/// before it reaches `Router::route`, so a conflicting definition is skipped
/// with a diagnostic instead of panicking; the first definition wins.
pub fn build_router(routes: &[Route]) -> Router {
    let mut router = Router::new();
    let mut claims = PathClaims::new();

    for route in routes {
        if !claims.claim(route.method, &route.endpoint) {
            warn!(
                "Route {:?} {} conflicts with an earlier route and was skipped; the first definition wins",
                route.method, route.endpoint
            );
            continue;
        }

        let state = RouteHandler {
            route: route.clone(),
        };
        let func = match route.method {
            HttpMethod::GET => get(mock_response).with_state(state),
            HttpMethod::POST => post(mock_response).with_state(state),
            HttpMethod::PUT => put(mock_response).with_state(state),
            HttpMethod::PATCH => patch(mock_response).with_state(state),
            HttpMethod::DELETE => delete(mock_response).with_state(state),
        };
        router = router.route(&route.endpoint, func);
    }
    router
}
