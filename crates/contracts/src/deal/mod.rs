//! Deals and price quotes.
//!
//! A Deal is server-owned; the client fetches it (together with the
//! platform commission settings), renders the binding financial summary
//! and drives the accept/reject lifecycle. All arithmetic the user can
//! audit lives here.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::offer::raw::{EnvelopeError, RawOfferItem};
use crate::offer::PLACEHOLDER_IMAGE;
use crate::shared::num::{parse_f64, parse_i64};

/// Commission defaults applied when platform settings are unavailable.
pub const DEFAULT_PLATFORM_RATE: f64 = 2.5;
pub const DEFAULT_SHIPPING_RATE: f64 = 5.0;

/// A quote stays answerable this long after it was sent.
pub const QUOTE_VALIDITY_HOURS: i64 = 72;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum DealStatus {
    Negotiation,
    Approved,
    Rejected,
    Cancelled,
    Paid,
    #[serde(other)]
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Party {
    pub name: Option<String>,
    pub company_name: Option<String>,
}

impl Party {
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.company_name.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DealItem {
    pub id: String,
    pub quantity: Value,
    pub negotiated_price: Value,
    pub offer_item: Option<RawOfferItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Deal {
    pub id: String,
    pub deal_number: Option<String>,
    pub status: DealStatus,
    pub negotiated_amount: Value,
    pub shipping_type: Option<String>,
    pub client: Option<Party>,
    pub trader: Option<Party>,
    pub employee: Option<Party>,
    pub items: Option<Vec<DealItem>>,
    pub quote_sent_at: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: Option<String>,
}

impl Deal {
    pub fn items(&self) -> &[DealItem] {
        self.items.as_deref().unwrap_or_default()
    }

    /// Persisted deal amount; 0 for deals created before the field
    /// existed (callers fall back to summing the items).
    pub fn negotiated_amount(&self) -> f64 {
        parse_f64(Some(&self.negotiated_amount), 0.0).value
    }

    pub fn quote_sent_at_time(&self) -> Option<DateTime<Utc>> {
        self.quote_sent_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc))
    }
}

/// Platform-wide commission percentages, read-only to the client. The
/// wire encodes the rates as numbers or numeric strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlatformSettings {
    pub platform_commission_rate: Value,
    pub shipping_commission_rate: Value,
}

impl PlatformSettings {
    pub fn platform_rate(&self) -> f64 {
        rate_or(&self.platform_commission_rate, DEFAULT_PLATFORM_RATE)
    }

    pub fn shipping_rate(&self) -> f64 {
        rate_or(&self.shipping_commission_rate, DEFAULT_SHIPPING_RATE)
    }
}

fn rate_or(value: &Value, default: f64) -> f64 {
    if value.is_null() {
        return default;
    }
    let parsed = parse_f64(Some(value), default);
    parsed.value
}

/// `GET /deals/{id}` payload: the deal plus (optionally) the platform
/// settings, under zero or one `data` wrappers.
#[derive(Debug, Clone)]
pub struct DealPayload {
    pub deal: Deal,
    pub platform_settings: Option<PlatformSettings>,
}

pub fn decode_deal_payload(body: &Value) -> Result<DealPayload, EnvelopeError> {
    let data = match body.get("data") {
        Some(inner) if inner.is_object() => inner,
        _ => body,
    };
    let deal_value = match data.get("deal") {
        Some(deal) if deal.is_object() => deal,
        _ => data,
    };
    let deal: Deal =
        serde_json::from_value(deal_value.clone()).map_err(|_| EnvelopeError::Unrecognized)?;
    let platform_settings = data
        .get("platformSettings")
        .and_then(|v| serde_json::from_value(v.clone()).ok());
    Ok(DealPayload {
        deal,
        platform_settings,
    })
}

/// One deal line resolved against its offer item, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteItem {
    pub id: String,
    pub title: String,
    pub item_number: String,
    pub description: String,
    pub image: String,
    /// Listed quantity of the underlying offer item.
    pub quantity: i64,
    pub pieces_per_carton: i64,
    pub price_per_piece: f64,
    pub cbm: f64,
    pub negotiated_price: f64,
    pub negotiated_quantity: i64,
    pub currency: String,
}

impl QuoteItem {
    /// `None` when the deal line lost its offer item reference.
    pub fn from_deal_item(deal_item: &DealItem, origin: &str) -> Option<Self> {
        let offer_item = deal_item.offer_item.as_ref()?;

        let image = item_image(offer_item, origin);
        let unit_price = parse_f64(non_null(&offer_item.unit_price), 0.0).value;
        let negotiated_price = match non_null(&deal_item.negotiated_price) {
            Some(raw) => parse_f64(Some(raw), unit_price).value,
            None => unit_price,
        };
        let short_id: String = offer_item.id.chars().take(8).collect();

        Some(Self {
            id: deal_item.id.clone(),
            title: offer_item
                .product_name
                .clone()
                .or_else(|| offer_item.description.clone())
                .unwrap_or_default(),
            item_number: offer_item
                .item_number
                .clone()
                .unwrap_or_else(|| format!("#{}", short_id)),
            description: offer_item
                .description
                .clone()
                .or_else(|| offer_item.notes.clone())
                .unwrap_or_default(),
            image,
            quantity: parse_i64(non_null(&offer_item.quantity), 0).value,
            pieces_per_carton: [&offer_item.package_quantity, &offer_item.cartons]
                .into_iter()
                .find(|v| !v.is_null())
                .map(|v| parse_i64(Some(v), 1).value)
                .unwrap_or(1)
                .max(1),
            price_per_piece: unit_price,
            cbm: [&offer_item.total_cbm, &offer_item.cbm]
                .into_iter()
                .find(|v| !v.is_null())
                .map(|v| parse_f64(Some(v), 0.0).value)
                .unwrap_or(0.0),
            negotiated_price,
            negotiated_quantity: parse_i64(non_null(&deal_item.quantity), 0).value,
            currency: offer_item
                .currency
                .clone()
                .unwrap_or_else(|| "USD".to_string()),
        })
    }

    pub fn total_price(&self) -> f64 {
        self.negotiated_quantity as f64 * self.negotiated_price
    }

    pub fn item_cbm(&self) -> f64 {
        if self.quantity <= 0 {
            return 0.0;
        }
        (self.negotiated_quantity as f64 / self.quantity as f64) * self.cbm
    }
}

fn non_null(value: &Value) -> Option<&Value> {
    (!value.is_null()).then_some(value)
}

fn item_image(offer_item: &RawOfferItem, origin: &str) -> String {
    use crate::offer::resolve_file_url;

    let list: Option<Vec<String>> = match &offer_item.images {
        Value::Array(elements) => Some(extract_urls(elements)),
        Value::String(encoded) => serde_json::from_str::<Value>(encoded)
            .ok()
            .and_then(|v| v.as_array().map(|e| extract_urls(e))),
        _ => None,
    };
    list.and_then(|urls| urls.first().cloned())
        .map(|url| resolve_file_url(&url, origin))
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())
}

fn extract_urls(elements: &[Value]) -> Vec<String> {
    elements
        .iter()
        .filter_map(|element| match element {
            Value::String(url) => Some(url.clone()),
            Value::Object(map) => map
                .get("url")
                .or_else(|| map.get("src"))
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        })
        .collect()
}

/// The binding financial summary shown on the quote page and written
/// into the exported sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteSummary {
    pub deal_amount: f64,
    pub platform_rate: f64,
    pub shipping_rate: f64,
    pub platform_commission: f64,
    pub shipping_commission: f64,
    pub grand_total: f64,
}

impl QuoteSummary {
    pub fn compute(deal: &Deal, items: &[QuoteItem], settings: Option<&PlatformSettings>) -> Self {
        let persisted = deal.negotiated_amount();
        let deal_amount = if persisted > 0.0 {
            persisted
        } else {
            items.iter().map(QuoteItem::total_price).sum()
        };

        let platform_rate = settings
            .map(PlatformSettings::platform_rate)
            .unwrap_or(DEFAULT_PLATFORM_RATE);
        let shipping_rate = settings
            .map(PlatformSettings::shipping_rate)
            .unwrap_or(DEFAULT_SHIPPING_RATE);

        let platform_commission = deal_amount * platform_rate / 100.0;
        let shipping_commission = deal_amount * shipping_rate / 100.0;

        Self {
            deal_amount,
            platform_rate,
            shipping_rate,
            platform_commission,
            shipping_commission,
            grand_total: deal_amount + platform_commission + shipping_commission,
        }
    }
}

/// What the quote page lets the user do, derived from status and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteActions {
    /// `NEGOTIATION`, quote still fresh: the client may answer.
    AcceptOrReject,
    /// `NEGOTIATION`, but the answer window has passed.
    Expired,
    /// `APPROVED`: read-only with a go-to-cart call to action.
    GoToCart,
    /// `PAID`: read-only with a payment-completed notice.
    PaymentCompleted,
    /// `CANCELLED` by the approval-window timeout.
    AutoCancelled,
    /// `CANCELLED` for any other reason.
    Cancelled,
    /// Rejected or unknown status: plain read-only.
    ReadOnly,
}

pub fn quote_actions(deal: &Deal, now: DateTime<Utc>) -> QuoteActions {
    match deal.status {
        DealStatus::Negotiation => {
            let expired = deal
                .quote_sent_at_time()
                .map(|sent| now - sent > Duration::hours(QUOTE_VALIDITY_HOURS))
                .unwrap_or(false);
            if expired {
                QuoteActions::Expired
            } else {
                QuoteActions::AcceptOrReject
            }
        }
        DealStatus::Approved => QuoteActions::GoToCart,
        DealStatus::Paid => QuoteActions::PaymentCompleted,
        DealStatus::Cancelled => {
            let auto = deal
                .cancellation_reason
                .as_deref()
                .map(|reason| {
                    reason.contains("72") || reason.contains("hours") || reason.contains("approval")
                })
                .unwrap_or(false);
            if auto {
                QuoteActions::AutoCancelled
            } else {
                QuoteActions::Cancelled
            }
        }
        DealStatus::Rejected | DealStatus::Unknown => QuoteActions::ReadOnly,
    }
}
