pub mod deal;
pub mod negotiation;
pub mod offer;
pub mod shared;
