//! SQLite database layer (embedded, no external dependencies)
//!
//! Every write sends a model signal through the shared [`SignalBus`] once the
//! statement has succeeded.

use anyhow::{Context, Result as AnyResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shop_core::ports::{CategoryStore, PriceStore, ProductStore, TaxClassStore};
use shop_core::{
    Category, CategoryFilter, ModelRef, ModelSignal, NewCategory, NewProduct, NewProductPrice,
    NewTaxClass, Price, Product, ProductPrice, RecordId, Result, ShopError, SignalBus, TaxClass,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

pub struct Database {
    pool: Arc<SqlitePool>,
    signals: Arc<SignalBus>,
}

impl Database {
    pub async fn new(
        database_path: &str,
        max_connections: u32,
        signals: Arc<SignalBus>,
    ) -> AnyResult<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path);

        // Create parent directory if needed
        if let Some(parent) = std::path::Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .with_context(|| {
                format!("Failed to connect to SQLite database at: {}", database_path)
            })?;

        Self::with_pool(pool, signals).await
    }

    /// Private in-memory database, used by tests and dry runs
    pub async fn in_memory(signals: Arc<SignalBus>) -> AnyResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("Invalid in-memory database URL")?
            .foreign_keys(true);

        // Each connection would see its own empty database, so keep exactly one alive
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?;

        Self::with_pool(pool, signals).await
    }

    async fn with_pool(pool: SqlitePool, signals: Arc<SignalBus>) -> AnyResult<Self> {
        tracing::info!("SQLite connection established, running migrations...");

        Self::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;

        tracing::info!("Database initialization complete");

        Ok(Self {
            pool: Arc::new(pool),
            signals,
        })
    }

    async fn run_migrations(pool: &SqlitePool) -> AnyResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                name TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE,
                ordering INTEGER NOT NULL DEFAULT 0 CHECK (ordering >= 0),
                description TEXT NOT NULL DEFAULT ''
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tax_classes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                rate TEXT NOT NULL,
                priority INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(pool)
        .await?;

        // AUTOINCREMENT keeps ids monotonic, latest-price lookups rely on it
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS product_prices (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
                currency TEXT NOT NULL,
                amount TEXT NOT NULL,
                tax_included BOOLEAN NOT NULL DEFAULT 1,
                tax_class_id INTEGER REFERENCES tax_classes(id) ON DELETE SET NULL,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                is_sale BOOLEAN NOT NULL DEFAULT 0,
                valid_from DATETIME NOT NULL,
                valid_until DATETIME
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_product_prices_product
            ON product_prices (product_id, currency)
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                is_internal BOOLEAN NOT NULL DEFAULT 0,
                name TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE,
                ordering INTEGER NOT NULL DEFAULT 0 CHECK (ordering >= 0),
                description TEXT NOT NULL DEFAULT '',
                parent_id INTEGER REFERENCES categories(id) ON DELETE CASCADE
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS product_categories (
                product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
                category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
                PRIMARY KEY (product_id, category_id)
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    fn notify(&self, signal: ModelSignal) {
        self.signals.send(signal);
    }
}

fn db_error(e: sqlx::Error) -> ShopError {
    if let sqlx::Error::Database(ref db) = e {
        if db.is_unique_violation() {
            return ShopError::Conflict(db.message().to_string());
        }
    }
    ShopError::Database(e.to_string())
}

fn parse_decimal(field: &str, raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw)
        .map_err(|e| ShopError::Database(format!("Corrupt {} value {:?}: {}", field, raw, e)))
}

#[async_trait]
impl ProductStore for Database {
    async fn create_product(&self, product: &NewProduct) -> Result<Product> {
        let result = sqlx::query(
            r#"
            INSERT INTO products (is_active, name, slug, ordering, description)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(product.is_active)
        .bind(&product.name)
        .bind(&product.slug)
        .bind(product.ordering)
        .bind(&product.description)
        .execute(&*self.pool)
        .await
        .map_err(db_error)?;

        let created = product.clone().into_product(result.last_insert_rowid());
        self.notify(ModelSignal::saved(
            ModelRef::Product { id: created.id },
            true,
        ));

        Ok(created)
    }

    async fn get_product(&self, id: RecordId) -> Result<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, is_active, name, slug, ordering, description
            FROM products WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn get_product_by_slug(&self, slug: &str) -> Result<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, is_active, name, slug, ordering, description
            FROM products WHERE slug = ?1
            "#,
        )
        .bind(slug)
        .fetch_optional(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn update_product(&self, product: &Product) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET is_active = ?1, name = ?2, slug = ?3, ordering = ?4, description = ?5
            WHERE id = ?6
            "#,
        )
        .bind(product.is_active)
        .bind(&product.name)
        .bind(&product.slug)
        .bind(product.ordering)
        .bind(&product.description)
        .bind(product.id)
        .execute(&*self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(ShopError::ProductNotFound(product.id.to_string()));
        }

        self.notify(ModelSignal::saved(
            ModelRef::Product { id: product.id },
            false,
        ));
        Ok(())
    }

    async fn delete_product(&self, id: RecordId) -> Result<()> {
        let prices = self.list_prices(id).await?;

        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query("DELETE FROM product_prices WHERE product_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(ShopError::ProductNotFound(id.to_string()));
        }

        tx.commit().await.map_err(db_error)?;

        // Announce each removed price, then the product itself
        for price in prices {
            self.notify(ModelSignal::deleted(ModelRef::ProductPrice {
                id: price.id,
                product_id: price.product_id,
            }));
        }
        self.notify(ModelSignal::deleted(ModelRef::Product { id }));
        Ok(())
    }

    async fn list_products(&self, active_only: bool) -> Result<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, is_active, name, slug, ordering, description
            FROM products
            WHERE (?1 = 0 OR is_active = 1)
            ORDER BY ordering, name
            "#,
        )
        .bind(active_only)
        .fetch_all(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn assign_category(&self, product_id: RecordId, category_id: RecordId) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO product_categories (product_id, category_id)
            VALUES (?1, ?2)
            "#,
        )
        .bind(product_id)
        .bind(category_id)
        .execute(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn list_products_in_category(&self, category_id: RecordId) -> Result<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT p.id, p.is_active, p.name, p.slug, p.ordering, p.description
            FROM products p
            JOIN product_categories pc ON pc.product_id = p.id
            WHERE pc.category_id = ?1
            ORDER BY p.ordering, p.name
            "#,
        )
        .bind(category_id)
        .fetch_all(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl PriceStore for Database {
    async fn create_price(&self, price: &NewProductPrice) -> Result<ProductPrice> {
        let fields = &price.price;
        let result = sqlx::query(
            r#"
            INSERT INTO product_prices (product_id, currency, amount, tax_included,
                                        tax_class_id, is_active, is_sale, valid_from, valid_until)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(price.product_id)
        .bind(&fields.currency)
        .bind(fields.amount.to_string())
        .bind(fields.tax_included)
        .bind(fields.tax_class_id)
        .bind(fields.is_active)
        .bind(fields.is_sale)
        .bind(fields.valid_from)
        .bind(fields.valid_until)
        .execute(&*self.pool)
        .await
        .map_err(db_error)?;

        let created = price.clone().into_price(result.last_insert_rowid());
        self.notify(ModelSignal::saved(
            ModelRef::ProductPrice {
                id: created.id,
                product_id: created.product_id,
            },
            true,
        ));

        Ok(created)
    }

    async fn get_price(&self, id: RecordId) -> Result<Option<ProductPrice>> {
        let row: Option<PriceRow> = sqlx::query_as(
            r#"
            SELECT id, product_id, currency, amount, tax_included, tax_class_id,
                   is_active, is_sale, valid_from, valid_until
            FROM product_prices WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(db_error)?;

        row.map(ProductPrice::try_from).transpose()
    }

    async fn update_price(&self, price: &ProductPrice) -> Result<()> {
        // The owning product may change, so flush the previous owner too
        let previous = self.get_price(price.id).await?;

        let result = sqlx::query(
            r#"
            UPDATE product_prices
            SET product_id = ?1, currency = ?2, amount = ?3, tax_included = ?4,
                tax_class_id = ?5, is_active = ?6, is_sale = ?7, valid_from = ?8,
                valid_until = ?9
            WHERE id = ?10
            "#,
        )
        .bind(price.product_id)
        .bind(&price.currency)
        .bind(price.amount.to_string())
        .bind(price.tax_included)
        .bind(price.tax_class_id)
        .bind(price.is_active)
        .bind(price.is_sale)
        .bind(price.valid_from)
        .bind(price.valid_until)
        .bind(price.id)
        .execute(&*self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(ShopError::PriceRecordNotFound(price.id));
        }

        if let Some(previous) = previous.filter(|p| p.product_id != price.product_id) {
            self.notify(ModelSignal::saved(
                ModelRef::ProductPrice {
                    id: previous.id,
                    product_id: previous.product_id,
                },
                false,
            ));
        }
        self.notify(ModelSignal::saved(
            ModelRef::ProductPrice {
                id: price.id,
                product_id: price.product_id,
            },
            false,
        ));
        Ok(())
    }

    async fn delete_price(&self, id: RecordId) -> Result<Option<ProductPrice>> {
        let Some(price) = self.get_price(id).await? else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM product_prices WHERE id = ?1")
            .bind(id)
            .execute(&*self.pool)
            .await
            .map_err(db_error)?;

        self.notify(ModelSignal::deleted(ModelRef::ProductPrice {
            id: price.id,
            product_id: price.product_id,
        }));
        Ok(Some(price))
    }

    async fn list_prices(&self, product_id: RecordId) -> Result<Vec<ProductPrice>> {
        let rows: Vec<PriceRow> = sqlx::query_as(
            r#"
            SELECT id, product_id, currency, amount, tax_included, tax_class_id,
                   is_active, is_sale, valid_from, valid_until
            FROM product_prices WHERE product_id = ?1
            "#,
        )
        .bind(product_id)
        .fetch_all(&*self.pool)
        .await
        .map_err(db_error)?;

        let mut prices = rows
            .into_iter()
            .map(ProductPrice::try_from)
            .collect::<Result<Vec<_>>>()?;
        // Timestamps are compared as values, not as their stored text
        prices.sort_by(|a, b| {
            b.valid_from
                .cmp(&a.valid_from)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(prices)
    }
}

#[async_trait]
impl CategoryStore for Database {
    async fn create_category(&self, category: &NewCategory) -> Result<Category> {
        let result = sqlx::query(
            r#"
            INSERT INTO categories (is_active, is_internal, name, slug, ordering,
                                    description, parent_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(category.is_active)
        .bind(category.is_internal)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(category.ordering)
        .bind(&category.description)
        .bind(category.parent_id)
        .execute(&*self.pool)
        .await
        .map_err(db_error)?;

        let created = category.clone().into_category(result.last_insert_rowid());
        self.notify(ModelSignal::saved(
            ModelRef::Category { id: created.id },
            true,
        ));

        Ok(created)
    }

    async fn get_category(&self, id: RecordId) -> Result<Option<Category>> {
        let row: Option<CategoryRow> = sqlx::query_as(
            r#"
            SELECT id, is_active, is_internal, name, slug, ordering, description, parent_id
            FROM categories WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn get_category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let row: Option<CategoryRow> = sqlx::query_as(
            r#"
            SELECT id, is_active, is_internal, name, slug, ordering, description, parent_id
            FROM categories WHERE slug = ?1
            "#,
        )
        .bind(slug)
        .fetch_optional(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn update_category(&self, category: &Category) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE categories
            SET is_active = ?1, is_internal = ?2, name = ?3, slug = ?4, ordering = ?5,
                description = ?6, parent_id = ?7
            WHERE id = ?8
            "#,
        )
        .bind(category.is_active)
        .bind(category.is_internal)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(category.ordering)
        .bind(&category.description)
        .bind(category.parent_id)
        .bind(category.id)
        .execute(&*self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(ShopError::CategoryNotFound(category.id.to_string()));
        }

        self.notify(ModelSignal::saved(
            ModelRef::Category { id: category.id },
            false,
        ));
        Ok(())
    }

    async fn delete_category(&self, id: RecordId) -> Result<()> {
        // Children go with their parent through the cascade
        let children = self.list_children(id).await?;

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&*self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(ShopError::CategoryNotFound(id.to_string()));
        }

        for child in children {
            self.notify(ModelSignal::deleted(ModelRef::Category { id: child.id }));
        }
        self.notify(ModelSignal::deleted(ModelRef::Category { id }));
        Ok(())
    }

    async fn list_categories(&self, filter: CategoryFilter) -> Result<Vec<Category>> {
        let (active_only, public_only) = match filter {
            CategoryFilter::All => (false, false),
            CategoryFilter::Active => (true, false),
            CategoryFilter::Public => (true, true),
        };

        // Top level categories sort first since their parent columns are NULL
        let rows: Vec<CategoryRow> = sqlx::query_as(
            r#"
            SELECT c.id, c.is_active, c.is_internal, c.name, c.slug, c.ordering,
                   c.description, c.parent_id
            FROM categories c
            LEFT JOIN categories p ON p.id = c.parent_id
            WHERE (?1 = 0 OR c.is_active = 1)
              AND (?2 = 0 OR c.is_internal = 0)
            ORDER BY p.ordering, p.name, c.ordering, c.name
            "#,
        )
        .bind(active_only)
        .bind(public_only)
        .fetch_all(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_children(&self, parent_id: RecordId) -> Result<Vec<Category>> {
        let rows: Vec<CategoryRow> = sqlx::query_as(
            r#"
            SELECT id, is_active, is_internal, name, slug, ordering, description, parent_id
            FROM categories WHERE parent_id = ?1
            ORDER BY ordering, name
            "#,
        )
        .bind(parent_id)
        .fetch_all(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl TaxClassStore for Database {
    async fn create_tax_class(&self, tax_class: &NewTaxClass) -> Result<TaxClass> {
        let result = sqlx::query(
            r#"
            INSERT INTO tax_classes (name, rate, priority)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&tax_class.name)
        .bind(tax_class.rate.to_string())
        .bind(tax_class.priority)
        .execute(&*self.pool)
        .await
        .map_err(db_error)?;

        let created = tax_class.clone().into_tax_class(result.last_insert_rowid());
        self.notify(ModelSignal::saved(
            ModelRef::TaxClass { id: created.id },
            true,
        ));

        Ok(created)
    }

    async fn get_tax_class(&self, id: RecordId) -> Result<Option<TaxClass>> {
        let row: Option<TaxClassRow> = sqlx::query_as(
            r#"
            SELECT id, name, rate, priority FROM tax_classes WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(db_error)?;

        row.map(TaxClass::try_from).transpose()
    }

    async fn list_tax_classes(&self) -> Result<Vec<TaxClass>> {
        let rows: Vec<TaxClassRow> = sqlx::query_as(
            r#"
            SELECT id, name, rate, priority FROM tax_classes
            ORDER BY priority DESC, name
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(TaxClass::try_from).collect()
    }
}

// Helper structs for sqlx query_as
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    is_active: bool,
    name: String,
    slug: String,
    ordering: u32,
    description: String,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Product {
            id: r.id,
            is_active: r.is_active,
            name: r.name,
            slug: r.slug,
            ordering: r.ordering,
            description: r.description,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PriceRow {
    id: i64,
    product_id: i64,
    currency: String,
    amount: String,
    tax_included: bool,
    tax_class_id: Option<i64>,
    is_active: bool,
    is_sale: bool,
    valid_from: DateTime<Utc>,
    valid_until: Option<DateTime<Utc>>,
}

impl TryFrom<PriceRow> for ProductPrice {
    type Error = ShopError;

    fn try_from(r: PriceRow) -> Result<Self> {
        Ok(ProductPrice {
            id: r.id,
            product_id: r.product_id,
            price: Price {
                amount: parse_decimal("amount", &r.amount)?,
                currency: r.currency,
                tax_included: r.tax_included,
                tax_class_id: r.tax_class_id,
                is_active: r.is_active,
                is_sale: r.is_sale,
                valid_from: r.valid_from,
                valid_until: r.valid_until,
            },
        })
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    is_active: bool,
    is_internal: bool,
    name: String,
    slug: String,
    ordering: u32,
    description: String,
    parent_id: Option<i64>,
}

impl From<CategoryRow> for Category {
    fn from(r: CategoryRow) -> Self {
        Category {
            id: r.id,
            is_active: r.is_active,
            is_internal: r.is_internal,
            name: r.name,
            slug: r.slug,
            ordering: r.ordering,
            description: r.description,
            parent_id: r.parent_id,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TaxClassRow {
    id: i64,
    name: String,
    rate: String,
    priority: i32,
}

impl TryFrom<TaxClassRow> for TaxClass {
    type Error = ShopError;

    fn try_from(r: TaxClassRow) -> Result<Self> {
        Ok(TaxClass {
            id: r.id,
            rate: parse_decimal("rate", &r.rate)?,
            name: r.name,
            priority: r.priority,
        })
    }
}
