use axum::http::StatusCode;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Serialize, Deserialize, PartialEq, Eq, Hash, Debug, Clone, Copy, JsonSchema)]
/// The HTTP method a mock endpoint answers to
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
}

impl HttpMethod {
    /// Parses a method name case-insensitively; anything outside the fixed
    /// verb set is rejected.
    pub fn parse(method: &str) -> Option<HttpMethod> {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::GET),
            "POST" => Some(HttpMethod::POST),
            "PUT" => Some(HttpMethod::PUT),
            "PATCH" => Some(HttpMethod::PATCH),
            "DELETE" => Some(HttpMethod::DELETE),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, JsonSchema)]
/// One mock endpoint definition, as found in a route definition file
pub struct Route {
    /// The path that the mock endpoint is exposed on
    pub endpoint: String,
    /// The method that the endpoint should accept
    pub method: HttpMethod,
    /// Expected request headers; values must be strings. Recorded for
    /// documentation purposes only, never matched against requests.
    pub headers: Option<HashMap<String, String>>,
    /// Expected request body shape; must be a JSON object when present.
    /// Recorded only, never matched.
    pub body: Option<Value>,
    /// The canned response returned for every request to the endpoint
    pub response: RouteResponse,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, JsonSchema)]
pub struct RouteResponse {
    /// The HTTP status code to respond with
    pub status: u16,
    /// The JSON value returned verbatim as the response body
    pub body: Value,
}

const REQUIRED_FIELDS: [&str; 3] = ["endpoint", "method", "response"];

/// Returns true only if `value` is a JSON object whose member values are all
/// strings.
pub fn validate_headers(value: &Value) -> bool {
    match value.as_object() {
        Some(map) => map.values().all(Value::is_string),
        None => false,
    }
}

/// Returns true only if `value` is a JSON object. Arrays and primitives are
/// rejected; contents are not inspected.
pub fn validate_body(value: &Value) -> bool {
    value.is_object()
}

/// Checks a raw route definition: required fields present, method in the
/// allowed set, response carrying both status and body, and optional fields
/// well-typed when present. Any single failed check rejects the whole route.
pub fn validate_route(value: &Value) -> bool {
    let Some(route) = value.as_object() else {
        return false;
    };

    for field in REQUIRED_FIELDS {
        if !route.contains_key(field) {
            return false;
        }
    }

    if route
        .get("method")
        .and_then(Value::as_str)
        .and_then(HttpMethod::parse)
        .is_none()
    {
        return false;
    }

    let Some(response) = route.get("response").and_then(Value::as_object) else {
        return false;
    };
    if !response.contains_key("status") || !response.contains_key("body") {
        return false;
    }

    if let Some(headers) = route.get("headers") {
        if !validate_headers(headers) {
            return false;
        }
    }

    if let Some(body) = route.get("body") {
        if !validate_body(body) {
            return false;
        }
    }

    true
}

impl Route {
    /// Validates a raw JSON value and converts it into a typed route.
    /// On top of `validate_route`, the endpoint must be a string beginning
    /// with `/` (the router cannot register anything else) and the response
    /// status must be an integer in the valid HTTP range. Returns `None` for
    /// anything the registrar should skip.
    pub fn from_value(value: &Value) -> Option<Route> {
        if !validate_route(value) {
            return None;
        }
        let raw = value.as_object()?;

        let endpoint = raw.get("endpoint")?.as_str()?;
        if !endpoint.starts_with('/') {
            return None;
        }

        let method = HttpMethod::parse(raw.get("method")?.as_str()?)?;

        let headers = match raw.get("headers") {
            Some(headers) => serde_json::from_value(headers.clone()).ok(),
            None => None,
        };
        let body = raw.get("body").cloned();

        let response = raw.get("response")?.as_object()?;
        let status = u16::try_from(response.get("status")?.as_u64()?).ok()?;
        StatusCode::from_u16(status).ok()?;

        Some(Route {
            endpoint: endpoint.to_string(),
            method,
            headers,
            body,
            response: RouteResponse {
                status,
                body: response.get("body")?.clone(),
            },
        })
    }
}

pub fn generate_schema() {
    let schema = schema_for!(Route);
    println!("{}", serde_json::to_string_pretty(&schema).unwrap());
}
