//! Offer endpoints: public listing and negotiation creation.

use contracts::negotiation::submit::{CreateNegotiationBody, PublicNegotiationBody};
use contracts::offer::raw::Envelope;
use gloo_net::http::Request;
use serde_json::Value;

use crate::shared::api_utils::{api_url, response_error};

/// Fetch the public offer records of one trader. The envelope is decoded
/// here; the records stay raw for the normalizer.
pub async fn fetch_trader_offers(
    trader_id: &str,
    offer_id: Option<&str>,
) -> Result<Vec<Value>, String> {
    let mut url = format!(
        "{}?page=1&limit=100",
        api_url(&format!(
            "/api/traders/{}/offers/public",
            urlencoding::encode(trader_id)
        ))
    );
    if let Some(id) = offer_id {
        url.push_str(&format!("&offerId={}", urlencoding::encode(id)));
    }

    let response = Request::get(&url)
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

/// Open a negotiation on one offer for the signed-in client. Returns the
/// id of the deal the server created; the items are attached in a second
/// request.
pub async fn create_negotiation(
    offer_id: &str,
    token: &str,
    body: &CreateNegotiationBody,
) -> Result<String, String> {
    let response = Request::post(&api_url(&format!(
        "/api/offers/{}/negotiations",
        urlencoding::encode(offer_id)
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

    let payload = response
        .json::<Value>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))?;

    created_deal_id(&payload).ok_or_else(|| "Negotiation response carried no deal id".to_string())
}

/// Guest variant: requester identity and items travel in one request,
/// so no follow-up call is needed.
pub async fn create_negotiation_public(
    offer_id: &str,
    body: &PublicNegotiationBody,
) -> Result<Option<String>, String> {
    let response = Request::post(&api_url(&format!(
        "/api/offers/{}/negotiations/public",
        urlencoding::encode(offer_id)
    )))
    .json(body)
    .map_err(|e| format!("Failed to serialize request: {}", e))?
    .send()
    .await
    .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(response_error(response).await);
    }

    let payload = response
        .json::<Value>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))?;

    Ok(created_deal_id(&payload))
}

/// Dig the created deal's id out of the response, whatever mix of
/// `data`/`deal` wrappers the endpoint used.
fn created_deal_id(payload: &Value) -> Option<String> {
    let mut data = payload.get("data").filter(|v| v.is_object()).unwrap_or(payload);
    if let Some(inner) = data.get("data").filter(|v| v.is_object()) {
        data = inner;
    }
    if let Some(deal) = data.get("deal").filter(|v| v.is_object()) {
        data = deal;
    }
    data.get("id").and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deal_id_is_found_under_any_wrapper() {
        let shapes = [
            json!({"id": "d1"}),
            json!({"data": {"id": "d1"}}),
            json!({"success": true, "data": {"data": {"id": "d1"}}}),
            json!({"data": {"deal": {"id": "d1", "status": "NEGOTIATION"}}}),
        ];
        for shape in &shapes {
            assert_eq!(created_deal_id(shape).as_deref(), Some("d1"), "{shape}");
        }

        assert_eq!(created_deal_id(&json!({"ok": true})), None);
        assert_eq!(created_deal_id(&json!({"data": {"id": 7}})), None);
    }
}
