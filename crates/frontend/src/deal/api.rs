//! Deal endpoints: fetching, item attachment and the quote lifecycle.

use contracts::deal::{decode_deal_payload, DealPayload};
use contracts::negotiation::submit::AttachItemsBody;
use contracts::offer::raw::Envelope;
use gloo_net::http::Request;
use serde_json::Value;

use crate::shared::api_utils::{api_url, response_error};

/// Fetch one deal together with the platform commission settings.
pub async fn fetch_deal(deal_id: &str) -> Result<DealPayload, String> {
    let response = Request::get(&api_url(&format!(
        "/api/deals/{}",
        urlencoding::encode(deal_id)
    )))
    .send()
    .await
    .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(response_error(response).await);
    }

    let body = response
        .json::<Value>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))?;

    decode_deal_payload(&body).map_err(|e| e.to_string())
}

/// List the signed-in client's deals. Records stay raw; the list page
/// only needs a couple of fields.
pub async fn fetch_deals(token: &str) -> Result<Vec<Value>, String> {
    let response = Request::get(&api_url("/api/deals"))
        .header("Authorization", &format!("Bearer {}", token))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(response_error(response).await);
    }

    let body = response
        .json::<Value>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))?;

    let envelope = Envelope::decode(&body).map_err(|e| e.to_string())?;
    Ok(envelope.into_records())
}

/// Attach negotiated items to a freshly created deal. Second step of the
/// authenticated submission flow, always after the create call.
pub async fn add_deal_items(deal_id: &str, token: &str, body: &AttachItemsBody) -> Result<(), String> {
    let response = Request::post(&api_url(&format!(
        "/api/deals/{}/items",
        urlencoding::encode(deal_id)
    )))
    .header("Authorization", &format!("Bearer {}", token))
    .json(body)
    .map_err(|e| format!("Failed to serialize request: {}", e))?
    .send()
    .await
    .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(response_error(response).await);
    }

    Ok(())
}

/// Client accepts the quote.
pub async fn client_accept(deal_id: &str, token: &str) -> Result<(), String> {
    quote_answer(deal_id, token, "accept").await
}

/// Client rejects the quote.
pub async fn client_reject(deal_id: &str, token: &str) -> Result<(), String> {
    quote_answer(deal_id, token, "reject").await
}

async fn quote_answer(deal_id: &str, token: &str, verb: &str) -> Result<(), String> {
    let response = Request::put(&api_url(&format!(
        "/api/deals/{}/client-{}",
        urlencoding::encode(deal_id),
        verb
    )))
    .header("Authorization", &format!("Bearer {}", token))
    .send()
    .await
    .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(response_error(response).await);
    }

    Ok(())
}
