//! Shop Catalog
//!
//! SQLite backed product catalogue with cached price resolution. Writes go
//! through [`Database`], which announces them on a signal bus; the
//! [`PriceCacheFlusher`] listens there and drops stale price sets from the
//! [`MemoryCache`].

pub mod commands;
pub mod services;
pub mod storage;

use anyhow::{Context, Result};
use shop_core::{ShopSettings, SignalBus};
use std::sync::Arc;
use tracing::info;

pub use services::{Catalog, PriceCacheFlusher};
pub use storage::{Database, MemoryCache};

/// Wired up catalogue state shared by the CLI and embedders
#[derive(Clone)]
pub struct Shop {
    pub settings: Arc<ShopSettings>,
    pub db: Arc<Database>,
    pub cache: Arc<MemoryCache>,
    pub catalog: Arc<Catalog>,
}

impl Shop {
    /// Open the database configured in `settings`
    pub async fn open(settings: ShopSettings) -> Result<Self> {
        settings.validate().context("Invalid shop settings")?;

        let cache = Arc::new(MemoryCache::new());
        let signals = Self::signals(&cache);
        let db = Database::new(
            &settings.database.path,
            settings.database.max_connections,
            signals,
        )
        .await
        .context("Failed to initialize database")?;

        Ok(Self::assemble(settings, db, cache))
    }

    /// Fresh shop backed by a private in-memory database
    pub async fn in_memory(settings: ShopSettings) -> Result<Self> {
        settings.validate().context("Invalid shop settings")?;

        let cache = Arc::new(MemoryCache::new());
        let signals = Self::signals(&cache);
        let db = Database::in_memory(signals).await?;

        Ok(Self::assemble(settings, db, cache))
    }

    fn signals(cache: &Arc<MemoryCache>) -> Arc<SignalBus> {
        let mut bus = SignalBus::new();
        bus.connect(Arc::new(PriceCacheFlusher::new(cache.clone())));
        Arc::new(bus)
    }

    fn assemble(settings: ShopSettings, db: Database, cache: Arc<MemoryCache>) -> Self {
        let settings = Arc::new(settings);
        let db = Arc::new(db);
        let catalog = Arc::new(Catalog::new(db.clone(), cache.clone(), settings.clone()));

        info!(
            "Shop ready: currencies={}, default={}",
            settings.currencies.join(","),
            settings.default_currency()
        );

        Self {
            settings,
            db,
            cache,
            catalog,
        }
    }
}
