//! Negotiation editor state.
//!
//! One immutable state value holds the normalized items plus the per-item
//! drafts, and every mutation (a keystroke, an inventory push) goes
//! through the same reducer. Drafts keep the raw user text; nothing is
//! validated while typing; validation runs at submission.

use std::collections::BTreeMap;

use crate::offer::{InventoryPatch, OfferItem};
use crate::shared::num::{parse_f64_str, parse_i64_str};

/// What the user has typed for one item. Empty strings mean "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NegotiationDraft {
    pub quantity: String,
    pub price: String,
}

impl NegotiationDraft {
    pub fn is_empty(&self) -> bool {
        self.quantity.trim().is_empty() && self.price.trim().is_empty()
    }

    /// Entered quantity, 0 when empty or malformed.
    pub fn quantity_value(&self) -> i64 {
        parse_i64_str(&self.quantity, 0).value
    }

    /// Entered price, falling back to the seller's listed price.
    pub fn price_value(&self, listed: f64) -> f64 {
        let parsed = parse_f64_str(&self.price, listed);
        if parsed.fallback_applied {
            listed
        } else {
            parsed.value
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Quantity,
    Price,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NegotiationAction {
    /// Update exactly one field of exactly one item's draft.
    SetField {
        item_id: String,
        field: DraftField,
        value: String,
    },
    /// Server-pushed inventory replacement for one item. Leaves the
    /// item's draft untouched.
    Inventory(InventoryPatch),
}

/// Items plus drafts, advanced only through [`NegotiationState::apply`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NegotiationState {
    pub items: Vec<OfferItem>,
    pub drafts: BTreeMap<String, NegotiationDraft>,
}

impl NegotiationState {
    pub fn new(items: Vec<OfferItem>) -> Self {
        Self {
            items,
            drafts: BTreeMap::new(),
        }
    }

    pub fn draft(&self, item_id: &str) -> NegotiationDraft {
        self.drafts.get(item_id).cloned().unwrap_or_default()
    }

    /// Pure transition: returns the next state, the current one is left
    /// as-is.
    pub fn apply(&self, action: NegotiationAction) -> Self {
        let mut next = self.clone();
        match action {
            NegotiationAction::SetField {
                item_id,
                field,
                value,
            } => {
                let draft = next.drafts.entry(item_id).or_default();
                match field {
                    DraftField::Quantity => draft.quantity = value,
                    DraftField::Price => draft.price = value,
                }
            }
            NegotiationAction::Inventory(patch) => {
                for item in &mut next.items {
                    item.apply_inventory(&patch);
                }
            }
        }
        next
    }

    /// Items the user is actually negotiating: not sold out, with at
    /// least one draft field entered.
    pub fn selected(&self) -> Vec<&OfferItem> {
        self.items
            .iter()
            .filter(|item| !item.sold_out && !self.draft(&item.id).is_empty())
            .collect()
    }

    /// Sold-out items that still hold draft values (kept visible in the
    /// summary so the user sees what got away).
    pub fn sold_out_with_drafts(&self) -> Vec<&OfferItem> {
        self.items
            .iter()
            .filter(|item| item.sold_out && !self.draft(&item.id).is_empty())
            .collect()
    }
}

/// Aggregate over the current drafts. Pure function of the state; the
/// interaction model recomputes it on every keystroke.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub quantity: i64,
    pub price: f64,
    pub cbm: f64,
}

impl Totals {
    pub fn compute(state: &NegotiationState) -> Self {
        let mut totals = Totals::default();

        for item in state.selected() {
            let draft = state.draft(&item.id);
            let qty = draft.quantity_value();
            let price = draft.price_value(item.price_per_piece);
            totals.quantity += qty;
            totals.price += qty as f64 * price;
            totals.cbm += item.cbm_for(qty);
        }

        // Sold-out items keep whatever was typed before they sold out;
        // no listed-price fallback for them.
        for item in state.sold_out_with_drafts() {
            let draft = state.draft(&item.id);
            let qty = draft.quantity_value();
            let price = parse_f64_str(&draft.price, 0.0).value;
            totals.quantity += qty;
            totals.price += qty as f64 * price;
            totals.cbm += item.cbm_for(qty);
        }

        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, quantity: i64, price: f64, cbm: f64) -> OfferItem {
        OfferItem {
            id: id.to_string(),
            offer_id: "offer-1".to_string(),
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
            cbm,
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
    fn set_field_touches_exactly_one_item() {
        let state = NegotiationState::new(vec![item("a", 100, 2.0, 1.0), item("b", 50, 3.0, 0.5)]);
        let next = set(&state, "a", DraftField::Quantity, "20");

        assert_eq!(next.draft("a").quantity, "20");
        assert!(next.draft("b").is_empty());
        // Original state untouched.
        assert!(state.draft("a").is_empty());
    }

    #[test]
    fn totals_use_listed_price_when_no_price_entered() {
        let state = NegotiationState::new(vec![item("a", 100, 2.5, 4.0)]);
        let state = set(&state, "a", DraftField::Quantity, "50");

        let totals = Totals::compute(&state);
        assert_eq!(totals.quantity, 50);
        assert_eq!(totals.price, 125.0);
        assert_eq!(totals.cbm, 2.0); // (50/100) * 4.0
    }

    #[test]
    fn totals_are_idempotent() {
        let state = NegotiationState::new(vec![item("a", 100, 2.0, 1.0), item("b", 40, 5.0, 2.0)]);
        let state = set(&state, "a", DraftField::Quantity, "30");
        let state = set(&state, "b", DraftField::Price, "4.5");

        assert_eq!(Totals::compute(&state), Totals::compute(&state));
    }

    #[test]
    fn zero_listed_quantity_contributes_no_cbm() {
        let mut zero = item("a", 0, 2.0, 5.0);
        zero.sold_out = false; // pathological record: no listing, not flagged
        let state = NegotiationState::new(vec![zero]);
        let state = set(&state, "a", DraftField::Quantity, "10");

        let totals = Totals::compute(&state);
        assert_eq!(totals.cbm, 0.0);
        assert_eq!(totals.quantity, 10);
    }

    #[test]
    fn sold_out_items_keep_their_typed_values_in_totals() {
        let live = item("a", 100, 2.0, 1.0);
        let doomed = item("b", 60, 3.0, 1.2);
        let state = NegotiationState::new(vec![live, doomed]);
        let state = set(&state, "b", DraftField::Quantity, "30");

        // Inventory push sells item b out mid-edit; draft survives.
        let state = state.apply(NegotiationAction::Inventory(InventoryPatch {
            offer_item_id: "b".into(),
            available_quantity: 0,
            reserved_quantity: 60,
        }));
        assert!(state.items[1].sold_out);
        assert_eq!(state.draft("b").quantity, "30");

        // Sold-out drafts count quantity but price falls back to 0.
        let totals = Totals::compute(&state);
        assert_eq!(totals.quantity, 30);
        assert_eq!(totals.price, 0.0);
    }
}
