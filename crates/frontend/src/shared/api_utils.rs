//! API utilities for frontend-backend communication
//!
//! Provides helper functions for constructing API URLs and for extracting
//! the server's error message out of a failed response.

use serde_json::Value;

/// Get the origin of the backend server
///
/// Constructs it from the current window location, using port 5000 for
/// the backend. Uploaded files are served from this origin too.
///
/// # Returns
/// - Origin like "http://localhost:5000" or "https://example.com:5000"
/// - Empty string if window is not available
pub fn api_origin() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:5000", protocol, hostname)
}

/// Build a full API URL from a path
///
/// # Arguments
/// * `path` - The API path (should start with "/api/")
///
/// # Example
/// ```ignore
/// let url = api_url("/api/deals/123");
/// ```
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_origin(), path)
}

/// WebSocket endpoint for inventory pushes, derived from the same origin.
pub fn ws_url() -> String {
    let origin = api_origin();
    let origin = origin
        .replacen("https://", "wss://", 1)
        .replacen("http://", "ws://", 1);
    format!("{}/ws/inventory", origin)
}

/// Pull the server's `message` field out of a non-2xx response body,
/// falling back to the HTTP status.
pub async fn response_error(response: gloo_net::http::Response) -> String {
    let status = response.status();
    if let Ok(body) = response.json::<Value>().await {
        if let Some(message) = body
            .get("message")
            .or_else(|| body.get("error"))
            .and_then(Value::as_str)
        {
            return message.to_string();
        }
    }
    format!("Request failed with status {}", status)
}
