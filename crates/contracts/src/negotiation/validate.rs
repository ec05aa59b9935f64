//! Submission validation.
//!
//! Three rule types, checked in a fixed order; the first failing rule is
//! returned with every offender inside it, so the user can fix a whole
//! class of problems at once. Validation errors never reach the network.

use thiserror::Error;

use super::draft::NegotiationState;

/// Item whose requested quantity exceeds what is still available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityOffender {
    pub item_id: String,
    pub title: String,
    pub requested: i64,
    pub available: i64,
}

/// Item whose requested quantity is not a whole number of cartons,
/// with the nearest valid multiples as suggestions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartonOffender {
    pub item_id: String,
    pub title: String,
    pub requested: i64,
    pub carton_size: i64,
    /// Nearest lower multiple; omitted when it would be zero.
    pub lower: Option<i64>,
    /// Nearest upper multiple.
    pub upper: i64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("no items selected for negotiation")]
    NoItemsSelected,
    #[error("requested quantity exceeds availability for: {}", offender_titles(.0))]
    QuantityExceedsAvailable(Vec<QuantityOffender>),
    #[error("quantity must be a carton multiple for: {}", carton_titles(.0))]
    NotCartonMultiple(Vec<CartonOffender>),
}

fn offender_titles(offenders: &[QuantityOffender]) -> String {
    offenders
        .iter()
        .map(|o| o.title.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn carton_titles(offenders: &[CartonOffender]) -> String {
    offenders
        .iter()
        .map(|o| o.title.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate the current draft before submission.
pub fn validate(state: &NegotiationState) -> Result<(), ValidationError> {
    let selected = state.selected();
    if selected.is_empty() {
        return Err(ValidationError::NoItemsSelected);
    }

    let over_available: Vec<QuantityOffender> = selected
        .iter()
        .filter_map(|item| {
            let requested = state.draft(&item.id).quantity_value();
            (requested > item.available_quantity).then(|| QuantityOffender {
                item_id: item.id.clone(),
                title: item.title.clone(),
                requested,
                available: item.available_quantity,
            })
        })
        .collect();
    if !over_available.is_empty() {
        return Err(ValidationError::QuantityExceedsAvailable(over_available));
    }

    let off_multiple: Vec<CartonOffender> = selected
        .iter()
        .filter_map(|item| {
            let requested = state.draft(&item.id).quantity_value();
            let carton = item.pieces_per_carton.max(1);
            if requested <= 0 || requested % carton == 0 {
                return None;
            }
            let lower = (requested / carton) * carton;
            Some(CartonOffender {
                item_id: item.id.clone(),
                title: item.title.clone(),
                requested,
                carton_size: carton,
                lower: (lower > 0).then_some(lower),
                upper: lower + carton,
            })
        })
        .collect();
    if !off_multiple.is_empty() {
        return Err(ValidationError::NotCartonMultiple(off_multiple));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::negotiation::draft::{DraftField, NegotiationAction, NegotiationState};
    use crate::offer::OfferItem;

    fn item(id: &str, available: i64, carton: i64) -> OfferItem {
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
            quantity: available,
            reserved_quantity: 0,
            available_quantity: available,
            pieces_per_carton: carton,
            price_per_piece: 1.0,
            cbm: 1.0,
            sold_out: available <= 0,
            currency: "SAR".to_string(),
        }
    }

    fn with_quantity(state: &NegotiationState, id: &str, qty: &str) -> NegotiationState {
        state.apply(NegotiationAction::SetField {
            item_id: id.to_string(),
            field: DraftField::Quantity,
            value: qty.to_string(),
        })
    }

    #[test]
    fn empty_selection_is_rejected() {
        let state = NegotiationState::new(vec![item("a", 100, 10)]);
        assert_eq!(validate(&state), Err(ValidationError::NoItemsSelected));
    }

    #[test]
    fn quantity_over_available_enumerates_offenders() {
        let state = NegotiationState::new(vec![item("a", 100, 10), item("b", 50, 10)]);
        let state = with_quantity(&state, "a", "150");
        let state = with_quantity(&state, "b", "60");

        match validate(&state) {
            Err(ValidationError::QuantityExceedsAvailable(offenders)) => {
                assert_eq!(offenders.len(), 2);
                assert_eq!(offenders[0].requested, 150);
                assert_eq!(offenders[0].available, 100);
            }
            other => panic!("expected quantity error, got {other:?}"),
        }
    }

    #[test]
    fn availability_is_checked_before_carton_multiples() {
        // 150 both exceeds availability and is off-multiple; the
        // availability rule wins.
        let state = NegotiationState::new(vec![item("a", 100, 40)]);
        let state = with_quantity(&state, "a", "150");
        assert!(matches!(
            validate(&state),
            Err(ValidationError::QuantityExceedsAvailable(_))
        ));
    }

    #[test]
    fn carton_multiple_rule_and_suggestions() {
        let state = NegotiationState::new(vec![item("a", 1000, 24)]);

        for q in [24i64, 48, 240] {
            let state = with_quantity(&state, "a", &q.to_string());
            assert_eq!(validate(&state), Ok(()));
        }

        let state = with_quantity(&state, "a", "50");
        match validate(&state) {
            Err(ValidationError::NotCartonMultiple(offenders)) => {
                assert_eq!(offenders[0].lower, Some(48));
                assert_eq!(offenders[0].upper, 72);
            }
            other => panic!("expected carton error, got {other:?}"),
        }

        // Below one carton: lower suggestion is omitted.
        let state = with_quantity(&state, "a", "10");
        match validate(&state) {
            Err(ValidationError::NotCartonMultiple(offenders)) => {
                assert_eq!(offenders[0].lower, None);
                assert_eq!(offenders[0].upper, 24);
            }
            other => panic!("expected carton error, got {other:?}"),
        }
    }

    #[test]
    fn price_only_selection_passes_quantity_rules() {
        let state = NegotiationState::new(vec![item("a", 100, 24)]);
        let state = state.apply(NegotiationAction::SetField {
            item_id: "a".to_string(),
            field: DraftField::Price,
            value: "3.20".to_string(),
        });
        assert_eq!(validate(&state), Ok(()));
    }

    #[test]
    fn sold_out_items_are_not_validated() {
        let state = NegotiationState::new(vec![item("dead", 0, 24), item("a", 100, 10)]);
        let state = with_quantity(&state, "dead", "7"); // off-multiple, but sold out
        let state = with_quantity(&state, "a", "50");
        assert_eq!(validate(&state), Ok(()));
    }
}
