//! CLI command handlers

pub mod category;
pub mod price;
pub mod product;
pub mod tax;
