pub mod inventory;
pub mod parse;
pub mod summarize;
