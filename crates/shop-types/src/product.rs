//! Product types

use crate::RecordId;
use serde::{Deserialize, Serialize};

/// A sellable product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: RecordId,
    pub is_active: bool,
    pub name: String,
    /// Unique URL fragment
    pub slug: String,
    pub ordering: u32,
    pub description: String,
}

impl Product {
    /// Cache key holding this product's computed price set
    pub fn price_cache_key(&self) -> String {
        price_cache_key(self.id)
    }
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Cache key for the price set of the product with the given id
pub fn price_cache_key(product_id: RecordId) -> String {
    format!("product-prices-{}", product_id)
}

/// Product creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub is_active: bool,
    pub name: String,
    pub slug: String,
    pub ordering: u32,
    pub description: String,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            is_active: true,
            name: name.into(),
            slug: slug.into(),
            ordering: 0,
            description: String::new(),
        }
    }

    pub fn ordering(mut self, ordering: u32) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach the id assigned by the store
    pub fn into_product(self, id: RecordId) -> Product {
        Product {
            id,
            is_active: self.is_active,
            name: self.name,
            slug: self.slug,
            ordering: self.ordering,
            description: self.description,
        }
    }
}
