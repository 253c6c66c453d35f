pub mod filter;
pub mod history;
