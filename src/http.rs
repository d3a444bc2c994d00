//! HTTP utilities for request/response handling and CORS

use lambda_http::http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use lambda_http::http::StatusCode;
use lambda_http::{Body, Response};
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

/// CORS origin header for all responses
pub fn get_cors_origin_header() -> (&'static str, &'static str) {
    ("Access-Control-Allow-Origin", "*")
}

/// Full CORS headers for OPTIONS preflight responses only
pub fn get_cors_preflight_headers() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Access-Control-Allow-Origin", "*"),
        ("Access-Control-Allow-Headers", "Content-Type,Authorization,X-Api-Key"),
        ("Access-Control-Allow-Methods", "GET,POST,OPTIONS"),
        ("Access-Control-Max-Age", "86400"),
    ]
}

fn with_headers(mut response: Response<Body>, headers: &[(&'static str, &'static str)]) -> Response<Body> {
    for &(key, value) in headers {
        if let Ok(name) = HeaderName::from_bytes(key.as_bytes()) {
            response.headers_mut().insert(name, HeaderValue::from_static(value));
        }
    }
    response
}

/// Build a JSON response with the CORS origin header.
///
/// Status codes outside the valid range collapse to 500.
pub fn json_response(status: u16, body: &Value) -> Response<Body> {
    raw_json_response(status, body.to_string())
}

/// Same as [`json_response`] but for a body that is already serialized.
pub fn raw_json_response(status: u16, body: String) -> Response<Body> {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    with_headers(response, &[get_cors_origin_header()])
}

/// Build an error response with consistent formatting
pub fn error_response(status: u16, error: &str, details: &str) -> Response<Body> {
    json_response(
        status,
        &json!({
            "error": error,
            "details": details,
        }),
    )
}

/// Error body carrying only a message, as the payment client expects it.
pub fn message_response(status: u16, error: &str) -> Response<Body> {
    json_response(status, &json!({ "error": error }))
}

/// Handle CORS preflight requests
pub fn handle_options() -> Response<Body> {
    let mut response = Response::new(Body::Empty);
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    with_headers(response, &get_cors_preflight_headers())
}

pub fn generate_short_id(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Read a request body as UTF-8 text. An empty body reads as `{}`.
pub fn body_text(body: &Body) -> Result<&str, std::str::Utf8Error> {
    match body {
        Body::Empty => Ok("{}"),
        Body::Text(s) => Ok(s),
        Body::Binary(b) => std::str::from_utf8(b),
        _ => Ok("{}"),
    }
}

/// Look up an optional field. A missing key and an explicit `null` both read as `None`.
pub fn get_value_in_json<T>(body: &Value, key: &str) -> Result<Option<T>, String>
where
    T: DeserializeOwned,
{
    match body.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => serde_json::from_value(v.clone())
            .map(Some)
            .map_err(|_| format!("{} is not a valid value", key)),
    }
}

/// Parse a JSON response body. Test helper.
#[cfg(test)]
pub fn body_json(response: &Response<Body>) -> Value {
    match response.body() {
        Body::Text(s) => serde_json::from_str(s).expect("response body is not JSON"),
        Body::Binary(b) => serde_json::from_slice(b).expect("response body is not JSON"),
        _ => Value::Null,
    }
}
