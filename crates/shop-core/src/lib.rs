//! Shop Core Library
//!
//! Settings, validation rules, price computation, model signals and the
//! storage ports implemented by persistence backends.

// Re-export pure types from shop-types
pub use shop_types::*;

pub mod config;
pub mod error;
pub mod ports;
pub mod pricing;
pub mod signals;
pub mod validation;

pub use config::ShopSettings;
pub use error::{Result, ShopError};
pub use pricing::{CurrencyPrices, PriceSet, ProductPrices};
pub use signals::{ModelRef, ModelSignal, SignalBus, SignalReceiver};
