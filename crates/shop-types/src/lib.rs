//! Shop Types - Pure type definitions for the shop catalogue
//!
//! This crate contains only plain data records with no storage or async
//! runtime dependencies.

pub mod category;
pub mod price;
pub mod product;
pub mod tax;

pub use category::*;
pub use price::*;
pub use product::*;
pub use tax::*;

/// Row identifier shared by every persisted record
pub type RecordId = i64;
