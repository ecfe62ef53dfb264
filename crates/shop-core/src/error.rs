//! Error types for the shop catalogue

use shop_types::RecordId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShopError>;

#[derive(Error, Debug)]
pub enum ShopError {
    #[error("No price for product {product_id} in currency {currency}")]
    PriceNotFound {
        product_id: RecordId,
        currency: String,
    },

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Price record not found: {0}")]
    PriceRecordNotFound(RecordId),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Tax class not found: {0}")]
    TaxClassNotFound(RecordId),

    #[error("Invalid parent category: {0}")]
    InvalidParent(String),

    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl ShopError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ShopError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// True for every "record does not exist" condition
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ShopError::PriceNotFound { .. }
                | ShopError::ProductNotFound(_)
                | ShopError::PriceRecordNotFound(_)
                | ShopError::CategoryNotFound(_)
                | ShopError::TaxClassNotFound(_)
        )
    }
}

impl From<serde_json::Error> for ShopError {
    fn from(e: serde_json::Error) -> Self {
        ShopError::Serialization(e.to_string())
    }
}

impl From<config::ConfigError> for ShopError {
    fn from(e: config::ConfigError) -> Self {
        ShopError::Config(e.to_string())
    }
}
