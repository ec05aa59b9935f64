//! Offer item normalization.
//!
//! Turns the nested, inconsistently shaped offer records returned by
//! `/traders/{id}/offers/public` into a flat list of negotiable line
//! items with derived fields (availability, sold-out flag, CBM, images,
//! currency). Pure transform: a broken record degrades to a warning, it
//! never aborts the rest of the listing.

pub mod raw;

use serde::Deserialize;
use serde_json::Value;

use crate::shared::flags::resolve_country_code;
use crate::shared::num::{parse_f64, parse_i64};
use raw::{RawOffer, RawOfferItem};

/// Shown whenever an item ends up with no usable image at all.
pub const PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1511707171634-5f897ff02aa9?auto=format&fit=crop&w=400&q=80";

/// A negotiable line item, flattened out of its parent offer.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferItem {
    pub id: String,
    pub offer_id: String,
    pub offer_title: String,
    pub title: String,
    pub item_number: String,
    pub description: String,
    pub notes: Option<String>,
    pub image: String,
    pub thumbnails: Vec<String>,
    pub images: Vec<String>,
    pub country_code: Option<String>,
    /// Total units listed by the seller.
    pub quantity: i64,
    /// Units committed to other in-flight deals.
    pub reserved_quantity: i64,
    /// `max(0, quantity - reserved_quantity)`, recomputed on every
    /// inventory event. Never decremented independently.
    pub available_quantity: i64,
    pub pieces_per_carton: i64,
    pub price_per_piece: f64,
    /// Volume for the full listed quantity.
    pub cbm: f64,
    pub sold_out: bool,
    pub currency: String,
}

impl OfferItem {
    /// Per-unit volume; zero-quantity listings contribute no volume.
    pub fn cbm_for(&self, units: i64) -> f64 {
        if self.quantity <= 0 {
            return 0.0;
        }
        (units as f64 / self.quantity as f64) * self.cbm
    }

    /// Apply a pushed inventory event. The server replaces, not adjusts:
    /// listed quantity is recomputed as available + reserved so the
    /// availability invariant keeps holding.
    pub fn apply_inventory(&mut self, patch: &InventoryPatch) {
        if self.id != patch.offer_item_id {
            return;
        }
        let available = patch.available_quantity.max(0);
        self.available_quantity = available;
        self.reserved_quantity = patch.reserved_quantity;
        self.quantity = available + patch.reserved_quantity;
        self.sold_out = available <= 0;
    }
}

/// Payload of the `inventory:update` WebSocket event.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct InventoryPatch {
    pub offer_item_id: String,
    pub available_quantity: i64,
    pub reserved_quantity: i64,
}

/// Result of a normalization pass. Warnings carry everything that had to
/// be coerced or skipped, for diagnostics only.
#[derive(Debug, Clone, Default)]
pub struct NormalizedOffers {
    pub items: Vec<OfferItem>,
    pub warnings: Vec<String>,
}

/// Flatten offer records into line items.
///
/// `offer_id` filters to one offer when the view was opened for a
/// specific listing; otherwise only the first offer is shown
/// (single-offer-per-view policy). `origin` is the API origin used to
/// rebase relative upload paths.
pub fn normalize_offers(
    records: Vec<Value>,
    offer_id: Option<&str>,
    origin: &str,
) -> NormalizedOffers {
    let mut out = NormalizedOffers::default();

    let mut offers: Vec<RawOffer> = Vec::new();
    for record in records {
        match serde_json::from_value::<RawOffer>(record) {
            Ok(offer) => offers.push(offer),
            Err(err) => out.warnings.push(format!("skipped unreadable offer record: {err}")),
        }
    }

    if let Some(wanted) = offer_id {
        offers.retain(|offer| offer.id == wanted);
    } else if offers.len() > 1 {
        offers.truncate(1);
    }

    for offer in &offers {
        let offer_images = match image_urls(&offer.images, origin) {
            Some(urls) => urls,
            None => {
                out.warnings
                    .push(format!("offer {}: unparseable images", offer.id));
                Vec::new()
            }
        };

        let raw_items: Vec<RawOfferItem> = match offer.items.as_array() {
            Some(elements) => elements
                .iter()
                .filter_map(|element| {
                    match serde_json::from_value::<RawOfferItem>(element.clone()) {
                        Ok(item) => Some(item),
                        Err(err) => {
                            out.warnings
                                .push(format!("offer {}: skipped item: {err}", offer.id));
                            None
                        }
                    }
                })
                .collect(),
            None => {
                if !offer.items.is_null() {
                    out.warnings
                        .push(format!("offer {}: items is not an array", offer.id));
                }
                Vec::new()
            }
        };

        let offer_currency = raw_items.first().and_then(|item| item.currency.clone());

        for item in &raw_items {
            out.items
                .push(normalize_item(item, offer, &offer_images, offer_currency.as_deref(), origin, &mut out.warnings));
        }
    }

    out
}

fn normalize_item(
    item: &RawOfferItem,
    offer: &RawOffer,
    offer_images: &[String],
    offer_currency: Option<&str>,
    origin: &str,
    warnings: &mut Vec<String>,
) -> OfferItem {
    let mut images = match image_urls(&item.images, origin) {
        Some(urls) => urls,
        None => {
            warnings.push(format!("item {}: unparseable images", item.id));
            Vec::new()
        }
    };
    if images.is_empty() {
        // Fall back to the offer's own first image.
        images = offer_images.first().cloned().into_iter().collect();
    }

    let quantity = coerce_i64(&item.quantity, 0, "quantity", &item.id, warnings);
    let reserved = coerce_i64(
        &item.reserved_quantity,
        0,
        "reservedQuantity",
        &item.id,
        warnings,
    );
    let available = (quantity - reserved).max(0);

    let pieces_per_carton = [&item.package_quantity, &item.cartons, &item.pieces_per_carton]
        .into_iter()
        .find(|v| !v.is_null())
        .map(|v| coerce_i64(v, 1, "packageQuantity", &item.id, warnings))
        .unwrap_or(1)
        .max(1);

    let cbm = [&item.total_cbm, &item.cbm, &item.volume]
        .into_iter()
        .find(|v| !v.is_null())
        .map(|v| coerce_f64(v, 0.0, "totalCBM", &item.id, warnings))
        .unwrap_or(0.0);

    let short_id: String = item.id.chars().take(8).collect();

    OfferItem {
        id: item.id.clone(),
        offer_id: offer.id.clone(),
        offer_title: offer.title.clone().unwrap_or_default(),
        title: item
            .product_name
            .clone()
            .or_else(|| item.description.clone())
            .unwrap_or_default(),
        item_number: item
            .item_number
            .clone()
            .unwrap_or_else(|| format!("#{}", short_id)),
        description: item
            .description
            .clone()
            .or_else(|| item.notes.clone())
            .unwrap_or_default(),
        notes: item.notes.clone(),
        image: images.first().cloned().unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        thumbnails: images.iter().skip(1).take(3).cloned().collect(),
        images: images.clone(),
        country_code: resolve_country_code([
            offer.country.as_deref(),
            offer.trader.as_ref().and_then(|t| t.country.as_deref()),
            offer.trader.as_ref().and_then(|t| t.country_code.as_deref()),
            item.country.as_deref(),
        ]),
        quantity,
        reserved_quantity: reserved,
        available_quantity: available,
        pieces_per_carton,
        price_per_piece: coerce_f64(&item.unit_price, 0.0, "unitPrice", &item.id, warnings),
        cbm,
        sold_out: available <= 0,
        currency: item
            .currency
            .clone()
            .or_else(|| offer_currency.map(str::to_string))
            .unwrap_or_else(|| "SAR".to_string()),
    }
}

/// Rebase an upload path onto the API origin. Absolute URLs pass through.
pub fn resolve_file_url(path: &str, origin: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else if path.starts_with('/') {
        format!("{origin}{path}")
    } else {
        format!("{origin}/uploads/{path}")
    }
}

/// Extract image URLs from an `images` field that may be a JSON array, a
/// JSON-encoded string of one, or a list of `{url}`/`{src}` objects.
/// `None` means the field was present but unparseable.
fn image_urls(value: &Value, origin: &str) -> Option<Vec<String>> {
    let parsed;
    let list = match value {
        Value::Null => return Some(Vec::new()),
        Value::Array(elements) => elements,
        Value::String(encoded) => {
            parsed = serde_json::from_str::<Value>(encoded).ok()?;
            match parsed.as_array() {
                Some(elements) => elements,
                None => return None,
            }
        }
        _ => return None,
    };

    Some(
        list.iter()
            .filter_map(|element| match element {
                Value::String(url) => Some(url.clone()),
                Value::Object(map) => map
                    .get("url")
                    .or_else(|| map.get("src"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            })
            .map(|url| resolve_file_url(&url, origin))
            .collect(),
    )
}

fn coerce_i64(
    value: &Value,
    fallback: i64,
    field: &str,
    item_id: &str,
    warnings: &mut Vec<String>,
) -> i64 {
    let raw = (!value.is_null()).then_some(value);
    let parsed = parse_i64(raw, fallback);
    if parsed.fallback_applied && raw.is_some() {
        warnings.push(format!("item {item_id}: malformed {field}, using {fallback}"));
    }
    parsed.value
}

fn coerce_f64(
    value: &Value,
    fallback: f64,
    field: &str,
    item_id: &str,
    warnings: &mut Vec<String>,
) -> f64 {
    let raw = (!value.is_null()).then_some(value);
    let parsed = parse_f64(raw, fallback);
    if parsed.fallback_applied && raw.is_some() {
        warnings.push(format!("item {item_id}: malformed {field}, using {fallback}"));
    }
    parsed.value
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ORIGIN: &str = "http://localhost:5000";

    fn offer_fixture() -> Value {
        json!({
            "id": "offer-1",
            "title": "Warehouse clearance",
            "country": "China",
            "images": ["/files/offer.jpg"],
            "items": [
                {
                    "id": "item-1",
                    "productName": "Steel kettle",
                    "itemNo": "SK-100",
                    "quantity": "500",
                    "reservedQuantity": 120,
                    "packageQuantity": 24,
                    "unitPrice": "4.75",
                    "totalCBM": 12.5,
                    "currency": "USD",
                    "images": "[\"kettle.jpg\", {\"url\": \"/files/kettle-side.jpg\"}]"
                },
                {
                    "id": "item-2",
                    "description": "Glass teapot",
                    "quantity": 80,
                    "reservedQuantity": 90,
                    "cartons": "12",
                    "unitPrice": 2.0,
                    "volume": "3.2",
                    "images": "{broken json"
                }
            ]
        })
    }

    #[test]
    fn flattens_items_with_derived_fields() {
        let normalized = normalize_offers(vec![offer_fixture()], None, ORIGIN);
        assert_eq!(normalized.items.len(), 2);

        let kettle = &normalized.items[0];
        assert_eq!(kettle.offer_id, "offer-1");
        assert_eq!(kettle.title, "Steel kettle");
        assert_eq!(kettle.item_number, "SK-100");
        assert_eq!(kettle.quantity, 500);
        assert_eq!(kettle.reserved_quantity, 120);
        assert_eq!(kettle.available_quantity, 380);
        assert_eq!(kettle.pieces_per_carton, 24);
        assert_eq!(kettle.price_per_piece, 4.75);
        assert_eq!(kettle.cbm, 12.5);
        assert!(!kettle.sold_out);
        assert_eq!(kettle.currency, "USD");
        assert_eq!(kettle.country_code.as_deref(), Some("cn"));
        // Relative path rebased, absolute-ish path kept under origin.
        assert_eq!(kettle.image, "http://localhost:5000/uploads/kettle.jpg");
        assert_eq!(
            kettle.thumbnails,
            vec!["http://localhost:5000/files/kettle-side.jpg".to_string()]
        );
    }

    #[test]
    fn availability_is_clamped_and_drives_sold_out() {
        let normalized = normalize_offers(vec![offer_fixture()], None, ORIGIN);
        let teapot = &normalized.items[1];
        assert_eq!(teapot.quantity, 80);
        assert_eq!(teapot.reserved_quantity, 90);
        assert_eq!(teapot.available_quantity, 0);
        assert!(teapot.sold_out);
        // Alias chain: cartons used when packageQuantity absent.
        assert_eq!(teapot.pieces_per_carton, 12);
        assert_eq!(teapot.cbm, 3.2);
        // Currency falls back to the offer's first item.
        assert_eq!(teapot.currency, "USD");
    }

    #[test]
    fn unparseable_item_images_fall_back_to_offer_then_placeholder() {
        let normalized = normalize_offers(vec![offer_fixture()], None, ORIGIN);
        let teapot = &normalized.items[1];
        // Broken item images -> offer image.
        assert_eq!(teapot.image, "http://localhost:5000/files/offer.jpg");
        assert!(normalized
            .warnings
            .iter()
            .any(|w| w.contains("unparseable images")));

        // No offer images either -> fixed placeholder.
        let mut bare = offer_fixture();
        bare["images"] = Value::Null;
        let normalized = normalize_offers(vec![bare], None, ORIGIN);
        assert_eq!(normalized.items[1].image, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn single_offer_per_view_policy() {
        let mut second = offer_fixture();
        second["id"] = json!("offer-2");

        // No explicit filter: only the first offer's items survive.
        let normalized = normalize_offers(vec![offer_fixture(), second.clone()], None, ORIGIN);
        assert!(normalized.items.iter().all(|i| i.offer_id == "offer-1"));

        // Explicit filter wins.
        let normalized =
            normalize_offers(vec![offer_fixture(), second], Some("offer-2"), ORIGIN);
        assert!(!normalized.items.is_empty());
        assert!(normalized.items.iter().all(|i| i.offer_id == "offer-2"));
    }

    #[test]
    fn inventory_patch_replaces_quantities() {
        let normalized = normalize_offers(vec![offer_fixture()], None, ORIGIN);
        let mut kettle = normalized.items[0].clone();

        kettle.apply_inventory(&InventoryPatch {
            offer_item_id: "item-1".into(),
            available_quantity: 0,
            reserved_quantity: 500,
        });
        assert_eq!(kettle.available_quantity, 0);
        assert_eq!(kettle.quantity, 500);
        assert!(kettle.sold_out);
        // Invariant: available == max(0, quantity - reserved).
        assert_eq!(
            kettle.available_quantity,
            (kettle.quantity - kettle.reserved_quantity).max(0)
        );

        // Patches for other items are ignored.
        let before = kettle.clone();
        kettle.apply_inventory(&InventoryPatch {
            offer_item_id: "item-9".into(),
            available_quantity: 1,
            reserved_quantity: 1,
        });
        assert_eq!(kettle, before);
    }

    #[test]
    fn malformed_numerics_are_warned_not_propagated() {
        let record = json!({
            "id": "offer-3",
            "items": [{"id": "item-x", "quantity": "many", "unitPrice": {}}]
        });
        let normalized = normalize_offers(vec![record], None, ORIGIN);
        let item = &normalized.items[0];
        assert_eq!(item.quantity, 0);
        assert_eq!(item.price_per_piece, 0.0);
        assert!(item.quantity >= 0); // never NaN / negative garbage
        assert!(normalized.warnings.iter().any(|w| w.contains("quantity")));
        assert!(normalized.warnings.iter().any(|w| w.contains("unitPrice")));
        // Missing item number falls back to a short-id tag.
        assert_eq!(item.item_number, "#item-x");
    }
}
