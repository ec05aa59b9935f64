pub mod flags;
pub mod num;
