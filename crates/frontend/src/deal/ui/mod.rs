pub mod negotiations;
pub mod price_quote;
