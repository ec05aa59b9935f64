//! Client-side negotiation workflow: draft editing, totals, submission
//! validation and per-offer request grouping.

pub mod draft;
pub mod submit;
pub mod validate;

pub use draft::{DraftField, NegotiationAction, NegotiationDraft, NegotiationState, Totals};
pub use submit::{GroupResult, NegotiationItem, OfferGroup, SubmissionReport};
pub use validate::{validate, CartonOffender, QuantityOffender, ValidationError};
