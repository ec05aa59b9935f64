//! Submission payloads.
//!
//! A negotiation/deal belongs to exactly one offer, so a validated draft
//! is partitioned into one request per distinct offer. Grouping is pure;
//! the frontend issues the requests concurrently and feeds the outcomes
//! back into a [`SubmissionReport`].

use serde::Serialize;

use super::draft::NegotiationState;

/// One line of a negotiation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NegotiationItem {
    pub offer_item_id: String,
    pub quantity: i64,
    pub negotiated_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// All selected items of one offer, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferGroup {
    pub offer_id: String,
    pub items: Vec<NegotiationItem>,
}

/// Body of `POST /offers/{id}/negotiations` (authenticated callers; the
/// session implies the requester identity).
#[derive(Debug, Clone, Serialize)]
pub struct CreateNegotiationBody {
    pub notes: Option<String>,
}

/// Body of `POST /offers/{id}/negotiations/public`. Guests must identify
/// themselves fully and carry the items inline.
#[derive(Debug, Clone, Serialize)]
pub struct PublicNegotiationBody {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub notes: Option<String>,
    pub items: Vec<NegotiationItem>,
}

/// Body of `POST /deals/{dealId}/items`: the second, ordered step of the
/// authenticated flow. Per-item notes are not part of this endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AttachItemsBody {
    pub items: Vec<AttachItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachItem {
    pub offer_item_id: String,
    pub quantity: i64,
    pub negotiated_price: f64,
}

impl From<&NegotiationItem> for AttachItem {
    fn from(item: &NegotiationItem) -> Self {
        Self {
            offer_item_id: item.offer_item_id.clone(),
            quantity: item.quantity,
            negotiated_price: item.negotiated_price,
        }
    }
}

/// Partition the selected items by their parent offer, first-appearance
/// order. Quantity falls back to the listed quantity and price to the
/// listed unit price when the draft left them empty.
pub fn group_by_offer(state: &NegotiationState) -> Vec<OfferGroup> {
    let mut groups: Vec<OfferGroup> = Vec::new();

    for item in state.selected() {
        let draft = state.draft(&item.id);
        let quantity = match draft.quantity_value() {
            0 => item.quantity,
            q => q,
        };
        let line = NegotiationItem {
            offer_item_id: item.id.clone(),
            quantity,
            negotiated_price: draft.price_value(item.price_per_piece),
            notes: item.notes.clone(),
        };

        match groups.iter_mut().find(|g| g.offer_id == item.offer_id) {
            Some(group) => group.items.push(line),
            None => groups.push(OfferGroup {
                offer_id: item.offer_id.clone(),
                items: vec![line],
            }),
        }
    }

    groups
}

/// Outcome of one per-offer request (including the attach step for
/// authenticated callers).
#[derive(Debug, Clone, PartialEq)]
pub struct GroupResult {
    pub offer_id: String,
    /// Deal created server-side, when the response carried one.
    pub deal_id: Option<String>,
    pub error: Option<String>,
}

impl GroupResult {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate over all groups. One success is enough to report the whole
/// submission as successful; the failures stay in the diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionReport {
    pub groups: Vec<GroupResult>,
}

impl SubmissionReport {
    pub fn any_succeeded(&self) -> bool {
        self.groups.iter().any(GroupResult::succeeded)
    }

    pub fn failures(&self) -> impl Iterator<Item = &GroupResult> {
        self.groups.iter().filter(|g| !g.succeeded())
    }

    /// First error message, surfaced only when no group succeeded.
    pub fn first_error(&self) -> Option<&str> {
        self.failures().find_map(|g| g.error.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::negotiation::draft::{DraftField, NegotiationAction, NegotiationState};
    use crate::offer::OfferItem;

    fn item(id: &str, offer_id: &str, quantity: i64, price: f64) -> OfferItem {
        OfferItem {
            id: id.to_string(),
            offer_id: offer_id.to_string(),
            offer_title: String::new(),
            title: format!("Item {id}"),
            item_number: format!("#{id}"),
            description: String::new(),
            notes: None,
            image: String::new(),
            thumbnails: Vec::new(),
            images: Vec::new(),
            country_code: None,
            quantity,
            reserved_quantity: 0,
            available_quantity: quantity,
            pieces_per_carton: 10,
            price_per_piece: price,
            cbm: 1.0,
            sold_out: quantity <= 0,
            currency: "SAR".to_string(),
        }
    }

    fn set(state: &NegotiationState, id: &str, field: DraftField, value: &str) -> NegotiationState {
        state.apply(NegotiationAction::SetField {
            item_id: id.to_string(),
            field,
            value: value.to_string(),
        })
    }

    #[test]
    fn partitions_by_offer_with_one_group_each() {
        let state = NegotiationState::new(vec![
            item("a1", "offer-a", 100, 2.0),
            item("b1", "offer-b", 50, 3.0),
            item("a2", "offer-a", 80, 1.5),
        ]);
        let state = set(&state, "a1", DraftField::Quantity, "20");
        let state = set(&state, "b1", DraftField::Quantity, "10");
        let state = set(&state, "a2", DraftField::Quantity, "40");

        let groups = group_by_offer(&state);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].offer_id, "offer-a");
        assert_eq!(groups[0].items.len(), 2);
        assert_eq!(groups[1].offer_id, "offer-b");
        assert_eq!(groups[1].items.len(), 1);
        assert!(groups[0]
            .items
            .iter()
            .all(|i| i.offer_item_id.starts_with('a')));
    }

    #[test]
    fn quantity_and_price_fall_back_to_listing() {
        // Price-only draft: quantity falls back to the listed quantity,
        // price is taken from the draft.
        let state = NegotiationState::new(vec![item("a1", "offer-a", 100, 2.0)]);
        let state = set(&state, "a1", DraftField::Price, "1.75");

        let groups = group_by_offer(&state);
        assert_eq!(groups[0].items[0].quantity, 100);
        assert_eq!(groups[0].items[0].negotiated_price, 1.75);

        // Quantity-only draft: price falls back to the listed price.
        let state = NegotiationState::new(vec![item("a1", "offer-a", 100, 2.0)]);
        let state = set(&state, "a1", DraftField::Quantity, "30");
        let groups = group_by_offer(&state);
        assert_eq!(groups[0].items[0].quantity, 30);
        assert_eq!(groups[0].items[0].negotiated_price, 2.0);
    }

    #[test]
    fn report_aggregates_partial_success() {
        let report = SubmissionReport {
            groups: vec![
                GroupResult {
                    offer_id: "offer-a".into(),
                    deal_id: Some("deal-1".into()),
                    error: None,
                },
                GroupResult {
                    offer_id: "offer-b".into(),
                    deal_id: None,
                    error: Some("quantity no longer available".into()),
                },
            ],
        };
        assert!(report.any_succeeded());
        assert_eq!(report.failures().count(), 1);

        let all_failed = SubmissionReport {
            groups: vec![GroupResult {
                offer_id: "offer-a".into(),
                deal_id: None,
                error: Some("server unreachable".into()),
            }],
        };
        assert!(!all_failed.any_succeeded());
        assert_eq!(all_failed.first_error(), Some("server unreachable"));
    }

    #[test]
    fn payloads_serialize_in_wire_casing() {
        let body = AttachItemsBody {
            items: vec![AttachItem {
                offer_item_id: "i1".into(),
                quantity: 20,
                negotiated_price: 4.5,
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["items"][0]["offerItemId"], "i1");
        assert_eq!(json["items"][0]["negotiatedPrice"], 4.5);

        let item = NegotiationItem {
            offer_item_id: "i1".into(),
            quantity: 20,
            negotiated_price: 4.5,
            notes: None,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("notes").is_none());
    }
}
