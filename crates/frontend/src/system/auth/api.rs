use gloo_net::http::Request;
use serde::Deserialize;
use serde_json::Value;

use crate::shared::api_utils::api_url;

/// The signed-in client, as returned by `/api/auth/me`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub name: Option<String>,
    pub company_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Get current user info, validating the stored token along the way
pub async fn get_current_user(token: &str) -> Result<UserInfo, String> {
    let response = Request::get(&api_url("/api/auth/me"))
        .header("Authorization", &format!("Bearer {}", token))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(format!("Get current user failed: {}", response.status()));
    }

    let body = response
        .json::<Value>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))?;

    // The profile may sit under "data" and/or "user" wrappers
    let mut user = &body;
    if let Some(inner) = user.get("data").filter(|v| v.is_object()) {
        user = inner;
    }
    if let Some(inner) = user.get("user").filter(|v| v.is_object()) {
        user = inner;
    }

    serde_json::from_value(user.clone()).map_err(|e| format!("Failed to parse user: {}", e))
}
