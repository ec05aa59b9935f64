pub mod api_utils;
pub mod export;
pub mod format;
pub mod i18n;
pub mod inventory;
