//! Storage traits for persistence
//!
//! Implementations send a post-save signal after every insert or update and
//! a post-delete signal after every delete.

use crate::Result;
use async_trait::async_trait;
use shop_types::{
    Category, CategoryFilter, NewCategory, NewProduct, NewProductPrice, NewTaxClass, Product,
    ProductPrice, RecordId, TaxClass,
};

/// Product store
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn create_product(&self, product: &NewProduct) -> Result<Product>;
    async fn get_product(&self, id: RecordId) -> Result<Option<Product>>;
    async fn get_product_by_slug(&self, slug: &str) -> Result<Option<Product>>;
    async fn update_product(&self, product: &Product) -> Result<()>;
    /// Removes the product together with its prices
    async fn delete_product(&self, id: RecordId) -> Result<()>;
    /// Ordered by `ordering`, then `name`
    async fn list_products(&self, active_only: bool) -> Result<Vec<Product>>;
    async fn assign_category(&self, product_id: RecordId, category_id: RecordId) -> Result<()>;
    async fn list_products_in_category(&self, category_id: RecordId) -> Result<Vec<Product>>;
}

/// Product price store
#[async_trait]
pub trait PriceStore: Send + Sync {
    async fn create_price(&self, price: &NewProductPrice) -> Result<ProductPrice>;
    async fn get_price(&self, id: RecordId) -> Result<Option<ProductPrice>>;
    async fn update_price(&self, price: &ProductPrice) -> Result<()>;
    /// Returns the removed record, if there was one
    async fn delete_price(&self, id: RecordId) -> Result<Option<ProductPrice>>;
    /// Most recent `valid_from` first
    async fn list_prices(&self, product_id: RecordId) -> Result<Vec<ProductPrice>>;
}

/// Category store
#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn create_category(&self, category: &NewCategory) -> Result<Category>;
    async fn get_category(&self, id: RecordId) -> Result<Option<Category>>;
    async fn get_category_by_slug(&self, slug: &str) -> Result<Option<Category>>;
    async fn update_category(&self, category: &Category) -> Result<()>;
    async fn delete_category(&self, id: RecordId) -> Result<()>;
    /// Ordered by parent ordering, parent name, ordering, name
    async fn list_categories(&self, filter: CategoryFilter) -> Result<Vec<Category>>;
    async fn list_children(&self, parent_id: RecordId) -> Result<Vec<Category>>;
}

/// Tax class store
#[async_trait]
pub trait TaxClassStore: Send + Sync {
    async fn create_tax_class(&self, tax_class: &NewTaxClass) -> Result<TaxClass>;
    async fn get_tax_class(&self, id: RecordId) -> Result<Option<TaxClass>>;
    /// Highest priority first
    async fn list_tax_classes(&self) -> Result<Vec<TaxClass>>;
}

/// Everything the catalogue service needs from a backend
pub trait CatalogStore: ProductStore + PriceStore + CategoryStore + TaxClassStore {}

impl<T> CatalogStore for T where T: ProductStore + PriceStore + CategoryStore + TaxClassStore {}
