//! Catalogue service: products, categories and cached price resolution

use crate::storage::MemoryCache;
use rust_decimal::Decimal;
use shop_core::ports::CatalogStore;
use shop_core::validation;
use shop_core::{
    price_cache_key, Category, CategoryFilter, NewCategory, NewProduct, NewProductPrice,
    NewTaxClass, Product, ProductPrice, ProductPrices, RecordId, Result, ShopError, ShopSettings,
    TaxClass,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub struct Catalog {
    store: Arc<dyn CatalogStore>,
    cache: Arc<MemoryCache>,
    settings: Arc<ShopSettings>,
}

impl Catalog {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        cache: Arc<MemoryCache>,
        settings: Arc<ShopSettings>,
    ) -> Self {
        Self {
            store,
            cache,
            settings,
        }
    }

    pub fn settings(&self) -> &ShopSettings {
        &self.settings
    }

    // Products

    pub async fn create_product(&self, product: NewProduct) -> Result<Product> {
        validation::validate_product(&product)?;
        let product = self.store.create_product(&product).await?;
        info!("Created product {} ({})", product.slug, product.id);
        Ok(product)
    }

    pub async fn update_product(&self, product: &Product) -> Result<()> {
        validation::validate_name(&product.name)?;
        validation::validate_slug(&product.slug)?;
        self.store.update_product(product).await
    }

    pub async fn delete_product(&self, id: RecordId) -> Result<()> {
        info!("Deleting product {}", id);
        self.store.delete_product(id).await
    }

    pub async fn product(&self, id: RecordId) -> Result<Product> {
        self.store
            .get_product(id)
            .await?
            .ok_or_else(|| ShopError::ProductNotFound(id.to_string()))
    }

    pub async fn product_by_slug(&self, slug: &str) -> Result<Product> {
        self.store
            .get_product_by_slug(slug)
            .await?
            .ok_or_else(|| ShopError::ProductNotFound(slug.to_string()))
    }

    pub async fn products(&self, active_only: bool) -> Result<Vec<Product>> {
        self.store.list_products(active_only).await
    }

    pub async fn assign_category(&self, product_id: RecordId, category_id: RecordId) -> Result<()> {
        self.product(product_id).await?;
        self.category(category_id).await?;
        self.store.assign_category(product_id, category_id).await
    }

    pub async fn products_in_category(&self, category_id: RecordId) -> Result<Vec<Product>> {
        self.store.list_products_in_category(category_id).await
    }

    // Prices

    pub async fn add_price(&self, price: NewProductPrice) -> Result<ProductPrice> {
        self.check_price(&price).await?;

        let price = self.store.create_price(&price).await?;
        info!("Added price {} to product {}", price, price.product_id);
        Ok(price)
    }

    pub async fn update_price(&self, price: &ProductPrice) -> Result<()> {
        let check = NewProductPrice {
            product_id: price.product_id,
            price: price.price.clone(),
        };
        self.check_price(&check).await?;
        self.store.update_price(price).await
    }

    async fn check_price(&self, price: &NewProductPrice) -> Result<()> {
        validation::validate_price(price, &self.settings)?;
        self.product(price.product_id).await?;
        if let Some(tax_class_id) = price.price.tax_class_id {
            self.tax_class(tax_class_id).await?;
        }
        Ok(())
    }

    pub async fn delete_price(&self, id: RecordId) -> Result<ProductPrice> {
        self.store
            .delete_price(id)
            .await?
            .ok_or(ShopError::PriceRecordNotFound(id))
    }

    /// Every price of a product, most recent `valid_from` first
    pub async fn price_history(&self, product_id: RecordId) -> Result<Vec<ProductPrice>> {
        self.store.list_prices(product_id).await
    }

    /// Normal and sale price per configured currency, memoized per product
    pub async fn get_prices(&self, product_id: RecordId) -> Result<ProductPrices> {
        let key = price_cache_key(product_id);

        if let Some(data) = self.cache.get(&key) {
            match serde_json::from_slice::<ProductPrices>(&data) {
                Ok(prices) => {
                    debug!("Price cache hit for product {}", product_id);
                    return Ok(prices);
                }
                Err(e) => debug!("Discarding unreadable price cache entry {}: {}", key, e),
            }
        }

        debug!("Price cache miss for product {}", product_id);
        let generation = self.cache.generation(&key);
        self.product(product_id).await?;
        let history = self.store.list_prices(product_id).await?;
        let prices = ProductPrices::compute(
            product_id,
            &history,
            &self.settings.currencies,
            chrono::Utc::now(),
        );

        let ttl = self.settings.cache.price_ttl_secs.map(Duration::from_secs);
        if !self
            .cache
            .set_if_generation(key, generation, serde_json::to_vec(&prices)?, ttl)
        {
            debug!("Prices of product {} changed while loading, not cached", product_id);
        }

        Ok(prices)
    }

    /// The applicable price in `currency`, or the shop's default currency
    ///
    /// A sale price wins over the normal price.
    pub async fn get_price(
        &self,
        product_id: RecordId,
        currency: Option<&str>,
    ) -> Result<ProductPrice> {
        let currency = currency.unwrap_or_else(|| self.settings.default_currency());
        let prices = self.get_prices(product_id).await?;
        prices.resolve(currency).cloned()
    }

    /// Applicable unit price with the tax treatment the shop displays
    pub async fn unit_price(
        &self,
        product_id: RecordId,
        currency: Option<&str>,
    ) -> Result<Decimal> {
        let price = self.get_price(product_id, currency).await?;
        let tax = match price.tax_class_id {
            Some(id) => self.store.get_tax_class(id).await?,
            None => None,
        };
        Ok(price.unit_price(tax.as_ref(), self.settings.price_includes_tax))
    }

    pub fn flush_price_cache(&self, product_id: RecordId) {
        debug!("Flushing price cache of product {}", product_id);
        self.cache.delete(&price_cache_key(product_id));
    }

    pub fn has_cached_prices(&self, product_id: RecordId) -> bool {
        self.cache.contains(&price_cache_key(product_id))
    }

    // Categories

    pub async fn create_category(&self, category: NewCategory) -> Result<Category> {
        validation::validate_category(&category)?;
        let parent = self.load_parent(category.parent_id).await?;
        validation::check_parent(None, parent.as_ref(), false)?;

        let category = self.store.create_category(&category).await?;
        info!("Created category {} ({})", category.slug, category.id);
        Ok(category)
    }

    pub async fn update_category(&self, category: &Category) -> Result<()> {
        validation::validate_name(&category.name)?;
        validation::validate_slug(&category.slug)?;

        let parent = self.load_parent(category.parent_id).await?;
        let has_children = parent.is_some()
            && !self.store.list_children(category.id).await?.is_empty();
        validation::check_parent(Some(category.id), parent.as_ref(), has_children)?;

        self.store.update_category(category).await
    }

    pub async fn delete_category(&self, id: RecordId) -> Result<()> {
        info!("Deleting category {}", id);
        self.store.delete_category(id).await
    }

    pub async fn category(&self, id: RecordId) -> Result<Category> {
        self.store
            .get_category(id)
            .await?
            .ok_or_else(|| ShopError::CategoryNotFound(id.to_string()))
    }

    pub async fn category_by_slug(&self, slug: &str) -> Result<Category> {
        self.store
            .get_category_by_slug(slug)
            .await?
            .ok_or_else(|| ShopError::CategoryNotFound(slug.to_string()))
    }

    pub async fn categories(&self, filter: CategoryFilter) -> Result<Vec<Category>> {
        self.store.list_categories(filter).await
    }

    pub async fn children(&self, parent_id: RecordId) -> Result<Vec<Category>> {
        self.store.list_children(parent_id).await
    }

    /// `"Parent - Child"` for nested categories, the plain name otherwise
    pub async fn category_label(&self, category: &Category) -> Result<String> {
        let parent = match category.parent_id {
            Some(id) => self.store.get_category(id).await?,
            None => None,
        };
        Ok(category.label(parent.as_ref()))
    }

    async fn load_parent(&self, parent_id: Option<RecordId>) -> Result<Option<Category>> {
        match parent_id {
            Some(id) => self
                .store
                .get_category(id)
                .await?
                .map(Some)
                .ok_or_else(|| {
                    ShopError::InvalidParent(format!("category {} does not exist", id))
                }),
            None => Ok(None),
        }
    }

    // Tax classes

    pub async fn create_tax_class(&self, tax_class: NewTaxClass) -> Result<TaxClass> {
        validation::validate_tax_class(&tax_class)?;
        self.store.create_tax_class(&tax_class).await
    }

    pub async fn tax_class(&self, id: RecordId) -> Result<TaxClass> {
        self.store
            .get_tax_class(id)
            .await?
            .ok_or(ShopError::TaxClassNotFound(id))
    }

    pub async fn tax_classes(&self) -> Result<Vec<TaxClass>> {
        self.store.list_tax_classes().await
    }
}

#[cfg(test)]
mod tests {
    use super::Catalog;
    use crate::{Database, Shop};
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use shop_core::ports::{CategoryStore, PriceStore, ProductStore, TaxClassStore};
    use shop_core::{
        price_cache_key, Category, CategoryFilter, NewCategory, NewProduct, NewProductPrice,
        NewTaxClass, Product, ProductPrice, RecordId, Result, ShopError, ShopSettings, TaxClass,
    };
    use std::sync::{Arc, Mutex};
    use tokio_test::{assert_err, assert_ok};

    async fn shop() -> Shop {
        Shop::in_memory(ShopSettings::default()).await.unwrap()
    }

    fn yesterday() -> chrono::DateTime<Utc> {
        Utc::now() - Duration::days(1)
    }

    #[tokio::test]
    async fn test_sale_price_preferred() {
        let shop = shop().await;
        let catalog = &shop.catalog;
        let tee = catalog
            .create_product(NewProduct::new("Tee", "tee"))
            .await
            .unwrap();

        catalog
            .add_price(
                NewProductPrice::new(tee.id, "CHF", Decimal::new(3000, 2)).valid_from(yesterday()),
            )
            .await
            .unwrap();
        let sale = catalog
            .add_price(
                NewProductPrice::new(tee.id, "CHF", Decimal::new(2000, 2))
                    .sale()
                    .valid_from(yesterday()),
            )
            .await
            .unwrap();

        let price = catalog.get_price(tee.id, Some("CHF")).await.unwrap();
        assert_eq!(price, sale);

        let prices = catalog.get_prices(tee.id).await.unwrap();
        let chf = prices.get("CHF").unwrap();
        assert_eq!(chf.normal.as_ref().unwrap().amount, Decimal::new(3000, 2));
    }

    #[tokio::test]
    async fn test_normal_price_in_default_currency() {
        let shop = shop().await;
        let catalog = &shop.catalog;
        let tee = catalog
            .create_product(NewProduct::new("Tee", "tee"))
            .await
            .unwrap();

        let normal = catalog
            .add_price(
                NewProductPrice::new(tee.id, "CHF", Decimal::new(3000, 2)).valid_from(yesterday()),
            )
            .await
            .unwrap();

        // CHF is the first configured currency
        assert_eq!(catalog.get_price(tee.id, None).await.unwrap(), normal);
    }

    #[tokio::test]
    async fn test_missing_price_is_not_found() {
        let shop = shop().await;
        let catalog = &shop.catalog;
        let tee = catalog
            .create_product(NewProduct::new("Tee", "tee"))
            .await
            .unwrap();
        catalog
            .add_price(NewProductPrice::new(tee.id, "CHF", Decimal::ONE).valid_from(yesterday()))
            .await
            .unwrap();

        let err = catalog.get_price(tee.id, Some("EUR")).await.unwrap_err();
        assert!(matches!(err, ShopError::PriceNotFound { ref currency, .. } if currency == "EUR"));
    }

    #[tokio::test]
    async fn test_prices_are_cached_until_flushed() {
        let shop = shop().await;
        let catalog = &shop.catalog;
        let tee = catalog
            .create_product(NewProduct::new("Tee", "tee"))
            .await
            .unwrap();

        assert!(!catalog.has_cached_prices(tee.id));
        let empty = catalog.get_prices(tee.id).await.unwrap();
        assert!(empty.is_empty());
        assert!(catalog.has_cached_prices(tee.id));
        assert!(shop.cache.contains(&price_cache_key(tee.id)));

        catalog.flush_price_cache(tee.id);
        assert!(!catalog.has_cached_prices(tee.id));
    }

    #[tokio::test]
    async fn test_saving_price_invalidates_cache() {
        let shop = shop().await;
        let catalog = &shop.catalog;
        let tee = catalog
            .create_product(NewProduct::new("Tee", "tee"))
            .await
            .unwrap();
        catalog
            .add_price(
                NewProductPrice::new(tee.id, "EUR", Decimal::new(25, 0)).valid_from(yesterday()),
            )
            .await
            .unwrap();

        assert_eq!(
            catalog.get_price(tee.id, Some("EUR")).await.unwrap().amount,
            Decimal::new(25, 0)
        );
        assert!(catalog.has_cached_prices(tee.id));

        let sale = catalog
            .add_price(
                NewProductPrice::new(tee.id, "EUR", Decimal::new(19, 0))
                    .sale()
                    .valid_from(yesterday()),
            )
            .await
            .unwrap();
        assert!(!catalog.has_cached_prices(tee.id));
        assert_eq!(catalog.get_price(tee.id, Some("EUR")).await.unwrap(), sale);

        // Editing a price flushes as well
        let mut edited = sale.clone();
        edited.amount = Decimal::new(17, 0);
        catalog.update_price(&edited).await.unwrap();
        assert!(!catalog.has_cached_prices(tee.id));
        assert_eq!(
            catalog.get_price(tee.id, Some("EUR")).await.unwrap().amount,
            Decimal::new(17, 0)
        );

        // Deleting the sale brings the normal price back
        catalog.delete_price(sale.id).await.unwrap();
        assert!(!catalog.has_cached_prices(tee.id));
        assert_eq!(
            catalog.get_price(tee.id, Some("EUR")).await.unwrap().amount,
            Decimal::new(25, 0)
        );
    }

    #[tokio::test]
    async fn test_saving_product_invalidates_cache() {
        let shop = shop().await;
        let catalog = &shop.catalog;
        let mut tee = catalog
            .create_product(NewProduct::new("Tee", "tee"))
            .await
            .unwrap();
        let other = catalog
            .create_product(NewProduct::new("Cap", "cap"))
            .await
            .unwrap();

        catalog.get_prices(tee.id).await.unwrap();
        catalog.get_prices(other.id).await.unwrap();

        tee.description = "Heavy cotton".to_string();
        catalog.update_product(&tee).await.unwrap();

        assert!(!catalog.has_cached_prices(tee.id));
        assert!(catalog.has_cached_prices(other.id));
    }

    #[tokio::test]
    async fn test_price_validation() {
        let shop = shop().await;
        let catalog = &shop.catalog;
        let tee = catalog
            .create_product(NewProduct::new("Tee", "tee"))
            .await
            .unwrap();

        let err = catalog
            .add_price(NewProductPrice::new(tee.id, "JPY", Decimal::ONE))
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::UnknownCurrency(_)));

        let err = catalog
            .add_price(NewProductPrice::new(tee.id + 100, "CHF", Decimal::ONE))
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::ProductNotFound(_)));

        let err = catalog
            .add_price(NewProductPrice::new(tee.id, "CHF", Decimal::ONE).tax_class(42))
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::TaxClassNotFound(42)));
    }

    #[tokio::test]
    async fn test_unit_price_applies_tax() {
        let mut settings = ShopSettings::default();
        settings.price_includes_tax = false;
        let shop = Shop::in_memory(settings).await.unwrap();
        let catalog = &shop.catalog;

        let vat = catalog
            .create_tax_class(NewTaxClass::new("VAT", Decimal::new(25, 0)))
            .await
            .unwrap();
        let tee = catalog
            .create_product(NewProduct::new("Tee", "tee"))
            .await
            .unwrap();
        catalog
            .add_price(
                NewProductPrice::new(tee.id, "CHF", Decimal::new(125, 0))
                    .tax_class(vat.id)
                    .valid_from(yesterday()),
            )
            .await
            .unwrap();

        assert_eq!(
            catalog.unit_price(tee.id, None).await.unwrap(),
            Decimal::new(100, 0)
        );
    }

    #[tokio::test]
    async fn test_single_level_categories() {
        let shop = shop().await;
        let catalog = &shop.catalog;

        let shirts = catalog
            .create_category(NewCategory::new("Shirts", "shirts"))
            .await
            .unwrap();
        let polos = catalog
            .create_category(NewCategory::new("Polos", "polos").parent(shirts.id))
            .await
            .unwrap();

        // A nested category cannot be a parent
        let err = catalog
            .create_category(NewCategory::new("Long Sleeve", "long-sleeve").parent(polos.id))
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::InvalidParent(_)));

        // A category with children cannot become nested
        let bags = catalog
            .create_category(NewCategory::new("Bags", "bags"))
            .await
            .unwrap();
        let mut moved = shirts.clone();
        moved.parent_id = Some(bags.id);
        assert_err!(catalog.update_category(&moved).await);

        // Neither can a category point at itself
        let mut selfish = bags.clone();
        selfish.parent_id = Some(bags.id);
        assert_err!(catalog.update_category(&selfish).await);

        // Unknown parents are rejected too
        let err = catalog
            .create_category(NewCategory::new("Orphan", "orphan").parent(999))
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::InvalidParent(_)));

        assert_eq!(
            catalog.category_label(&polos).await.unwrap(),
            "Shirts - Polos"
        );
        assert_eq!(catalog.children(shirts.id).await.unwrap(), vec![polos]);
    }

    #[tokio::test]
    async fn test_moving_leaf_category_is_allowed() {
        let shop = shop().await;
        let catalog = &shop.catalog;

        let shirts = catalog
            .create_category(NewCategory::new("Shirts", "shirts"))
            .await
            .unwrap();
        let mut hats = catalog
            .create_category(NewCategory::new("Hats", "hats"))
            .await
            .unwrap();

        hats.parent_id = Some(shirts.id);
        assert_ok!(catalog.update_category(&hats).await);
        assert_eq!(catalog.category(hats.id).await.unwrap().parent_id, Some(shirts.id));
    }

    #[tokio::test]
    async fn test_products_in_category() {
        let shop = shop().await;
        let catalog = &shop.catalog;

        let internal = catalog
            .create_category(NewCategory::new("Discountable", "discountable").internal())
            .await
            .unwrap();
        let tee = catalog
            .create_product(NewProduct::new("Tee", "tee"))
            .await
            .unwrap();
        catalog
            .create_product(NewProduct::new("Cap", "cap"))
            .await
            .unwrap();

        catalog.assign_category(tee.id, internal.id).await.unwrap();
        // Assigning twice is harmless
        catalog.assign_category(tee.id, internal.id).await.unwrap();

        assert_eq!(
            catalog.products_in_category(internal.id).await.unwrap(),
            vec![tee]
        );
        assert!(catalog
            .categories(CategoryFilter::Public)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_invalid_slug_is_rejected() {
        let shop = shop().await;
        let err = shop
            .catalog
            .create_product(NewProduct::new("Tee", "not a slug"))
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::Validation { ref field, .. } if field == "slug"));
    }

    #[tokio::test]
    async fn test_unknown_product_has_no_prices() {
        let shop = shop().await;
        let catalog = &shop.catalog;

        for id in 1000..1010 {
            let err = catalog.get_prices(id).await.unwrap_err();
            assert!(matches!(err, ShopError::ProductNotFound(_)));
        }
        assert!(shop.cache.is_empty());

        let err = catalog.get_price(424242, Some("CHF")).await.unwrap_err();
        assert!(matches!(err, ShopError::ProductNotFound(_)));
    }

    #[tokio::test]
    async fn test_update_price_checks_references() {
        let shop = shop().await;
        let catalog = &shop.catalog;
        let tee = catalog
            .create_product(NewProduct::new("Tee", "tee"))
            .await
            .unwrap();
        let price = catalog
            .add_price(NewProductPrice::new(tee.id, "CHF", Decimal::ONE))
            .await
            .unwrap();

        let mut moved = price.clone();
        moved.product_id = tee.id + 100;
        let err = catalog.update_price(&moved).await.unwrap_err();
        assert!(matches!(err, ShopError::ProductNotFound(_)));

        let mut taxed = price.clone();
        taxed.tax_class_id = Some(42);
        let err = catalog.update_price(&taxed).await.unwrap_err();
        assert!(matches!(err, ShopError::TaxClassNotFound(42)));

        assert_eq!(catalog.price_history(tee.id).await.unwrap(), vec![price]);
    }

    #[tokio::test]
    async fn test_price_saved_while_loading_is_not_masked() {
        let shop = shop().await;
        let tee = shop
            .catalog
            .create_product(NewProduct::new("Tee", "tee"))
            .await
            .unwrap();
        shop.catalog
            .add_price(
                NewProductPrice::new(tee.id, "CHF", Decimal::new(30, 0)).valid_from(yesterday()),
            )
            .await
            .unwrap();

        let store = Arc::new(WritesAfterListing {
            inner: shop.db.clone(),
            pending: Mutex::new(Some(
                NewProductPrice::new(tee.id, "CHF", Decimal::new(20, 0))
                    .sale()
                    .valid_from(yesterday()),
            )),
        });
        let catalog = Catalog::new(store, shop.cache.clone(), shop.settings.clone());

        // The first read loaded its history before the sale landed
        let first = catalog.get_price(tee.id, Some("CHF")).await.unwrap();
        assert_eq!(first.amount, Decimal::new(30, 0));
        assert!(!catalog.has_cached_prices(tee.id));

        let later = catalog.get_price(tee.id, Some("CHF")).await.unwrap();
        assert!(later.is_sale);
        assert_eq!(later.amount, Decimal::new(20, 0));
        assert!(catalog.has_cached_prices(tee.id));
    }

    /// Saves a queued price right after the next price listing returns
    struct WritesAfterListing {
        inner: Arc<Database>,
        pending: Mutex<Option<NewProductPrice>>,
    }

    #[async_trait]
    impl ProductStore for WritesAfterListing {
        async fn create_product(&self, product: &NewProduct) -> Result<Product> {
            self.inner.create_product(product).await
        }
        async fn get_product(&self, id: RecordId) -> Result<Option<Product>> {
            self.inner.get_product(id).await
        }
        async fn get_product_by_slug(&self, slug: &str) -> Result<Option<Product>> {
            self.inner.get_product_by_slug(slug).await
        }
        async fn update_product(&self, product: &Product) -> Result<()> {
            self.inner.update_product(product).await
        }
        async fn delete_product(&self, id: RecordId) -> Result<()> {
            self.inner.delete_product(id).await
        }
        async fn list_products(&self, active_only: bool) -> Result<Vec<Product>> {
            self.inner.list_products(active_only).await
        }
        async fn assign_category(&self, product_id: RecordId, category_id: RecordId) -> Result<()> {
            self.inner.assign_category(product_id, category_id).await
        }
        async fn list_products_in_category(&self, category_id: RecordId) -> Result<Vec<Product>> {
            self.inner.list_products_in_category(category_id).await
        }
    }

    #[async_trait]
    impl PriceStore for WritesAfterListing {
        async fn create_price(&self, price: &NewProductPrice) -> Result<ProductPrice> {
            self.inner.create_price(price).await
        }
        async fn get_price(&self, id: RecordId) -> Result<Option<ProductPrice>> {
            PriceStore::get_price(&*self.inner, id).await
        }
        async fn update_price(&self, price: &ProductPrice) -> Result<()> {
            self.inner.update_price(price).await
        }
        async fn delete_price(&self, id: RecordId) -> Result<Option<ProductPrice>> {
            self.inner.delete_price(id).await
        }
        async fn list_prices(&self, product_id: RecordId) -> Result<Vec<ProductPrice>> {
            let prices = self.inner.list_prices(product_id).await?;
            let pending = self.pending.lock().unwrap().take();
            if let Some(price) = pending {
                self.inner.create_price(&price).await?;
            }
            Ok(prices)
        }
    }

    #[async_trait]
    impl CategoryStore for WritesAfterListing {
        async fn create_category(&self, category: &NewCategory) -> Result<Category> {
            self.inner.create_category(category).await
        }
        async fn get_category(&self, id: RecordId) -> Result<Option<Category>> {
            self.inner.get_category(id).await
        }
        async fn get_category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
            self.inner.get_category_by_slug(slug).await
        }
        async fn update_category(&self, category: &Category) -> Result<()> {
            self.inner.update_category(category).await
        }
        async fn delete_category(&self, id: RecordId) -> Result<()> {
            self.inner.delete_category(id).await
        }
        async fn list_categories(&self, filter: CategoryFilter) -> Result<Vec<Category>> {
            self.inner.list_categories(filter).await
        }
        async fn list_children(&self, parent_id: RecordId) -> Result<Vec<Category>> {
            self.inner.list_children(parent_id).await
        }
    }

    #[async_trait]
    impl TaxClassStore for WritesAfterListing {
        async fn create_tax_class(&self, tax_class: &NewTaxClass) -> Result<TaxClass> {
            self.inner.create_tax_class(tax_class).await
        }
        async fn get_tax_class(&self, id: RecordId) -> Result<Option<TaxClass>> {
            self.inner.get_tax_class(id).await
        }
        async fn list_tax_classes(&self) -> Result<Vec<TaxClass>> {
            self.inner.list_tax_classes().await
        }
    }
}
