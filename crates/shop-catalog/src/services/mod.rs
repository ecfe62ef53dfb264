//! Business logic services

pub mod catalog;
pub mod price_cache;

pub use catalog::Catalog;
pub use price_cache::PriceCacheFlusher;
