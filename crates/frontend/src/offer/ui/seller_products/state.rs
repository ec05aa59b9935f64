use contracts::negotiation::draft::{NegotiationAction, NegotiationState};
use leptos::prelude::*;

/// Page state: the normalized items plus the negotiation drafts. All
/// mutations funnel through [`dispatch`].
#[derive(Debug, Clone, Default)]
pub struct SellerProductsState {
    pub negotiation: NegotiationState,
    pub loaded: bool,
}

pub fn create_state() -> RwSignal<SellerProductsState> {
    RwSignal::new(SellerProductsState::default())
}

/// Advance the negotiation through its reducer. Keystrokes and pushed
/// inventory events take the same path.
pub fn dispatch(state: RwSignal<SellerProductsState>, action: NegotiationAction) {
    state.update(|s| s.negotiation = s.negotiation.apply(action));
}
