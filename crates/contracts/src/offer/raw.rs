//! Wire-side types for the public offers listing.
//!
//! The backend is duck-typed: list payloads arrive in one of several
//! envelopes, and item fields show up under historical alias names with
//! numbers encoded either as JSON numbers or strings. Everything here is
//! deliberately tolerant; strictness lives in the normalizer.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// The envelopes the offers endpoint has been observed to produce.
///
/// Decoded exactly once at the API boundary instead of re-sniffing the
/// shape at every call site.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// `{ "success": true, "data": [...] }`
    Paginated(Vec<Value>),
    /// `{ "success": true, "data": { "data": [...] } }`
    NestedPaginated(Vec<Value>),
    /// Bare `[...]`
    Direct(Vec<Value>),
    /// `{ "data": [...] }` without the success flag
    Wrapped(Vec<Value>),
}

#[derive(Debug, Error, PartialEq)]
pub enum EnvelopeError {
    #[error("unrecognized response envelope")]
    Unrecognized,
}

impl Envelope {
    pub fn decode(body: &Value) -> Result<Self, EnvelopeError> {
        if body
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false)
        {
            if let Some(records) = body.get("data").and_then(Value::as_array) {
                return Ok(Envelope::Paginated(records.clone()));
            }
            if let Some(records) = body
                .get("data")
                .and_then(|d| d.get("data"))
                .and_then(Value::as_array)
            {
                return Ok(Envelope::NestedPaginated(records.clone()));
            }
        }
        if let Some(records) = body.as_array() {
            return Ok(Envelope::Direct(records.clone()));
        }
        if let Some(records) = body.get("data").and_then(Value::as_array) {
            return Ok(Envelope::Wrapped(records.clone()));
        }
        Err(EnvelopeError::Unrecognized)
    }

    pub fn into_records(self) -> Vec<Value> {
        match self {
            Envelope::Paginated(r)
            | Envelope::NestedPaginated(r)
            | Envelope::Direct(r)
            | Envelope::Wrapped(r) => r,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTrader {
    pub country: Option<String>,
    #[serde(rename = "countryCode")]
    pub country_code: Option<String>,
}

/// One published offer as returned by `/traders/{id}/offers/public`.
///
/// `items` stays a raw `Value` so a malformed element can be skipped
/// without aborting the rest of the offer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawOffer {
    pub id: String,
    pub title: Option<String>,
    pub images: Value,
    pub country: Option<String>,
    pub trader: Option<RawTrader>,
    pub items: Value,
}

/// One offer line item. Numeric fields stay `Value` (number-or-string on
/// the wire); alias chains are resolved field-by-field in the normalizer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawOfferItem {
    pub id: String,
    #[serde(rename = "productName")]
    pub product_name: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    #[serde(rename = "itemNo", alias = "itemNumber")]
    pub item_number: Option<String>,
    pub images: Value,
    pub quantity: Value,
    #[serde(rename = "reservedQuantity")]
    pub reserved_quantity: Value,
    #[serde(rename = "packageQuantity")]
    pub package_quantity: Value,
    pub cartons: Value,
    #[serde(rename = "piecesPerCarton")]
    pub pieces_per_carton: Value,
    #[serde(rename = "unitPrice")]
    pub unit_price: Value,
    #[serde(rename = "totalCBM")]
    pub total_cbm: Value,
    pub cbm: Value,
    pub volume: Value,
    pub currency: Option<String>,
    pub country: Option<String>,
}
