//! Price cache invalidation

use crate::storage::MemoryCache;
use shop_core::{price_cache_key, ModelRef, ModelSignal, RecordId, SignalReceiver};
use std::sync::Arc;
use tracing::debug;

/// Drops a product's cached price set whenever the product or one of its
/// prices is saved or deleted
pub struct PriceCacheFlusher {
    cache: Arc<MemoryCache>,
}

impl PriceCacheFlusher {
    pub fn new(cache: Arc<MemoryCache>) -> Self {
        Self { cache }
    }

    pub fn flush(&self, product_id: RecordId) {
        if self.cache.delete(&price_cache_key(product_id)) {
            debug!("Flushed price cache of product {}", product_id);
        }
    }
}

impl SignalReceiver for PriceCacheFlusher {
    fn receive(&self, signal: &ModelSignal) {
        match signal.model() {
            ModelRef::Product { id } => self.flush(*id),
            ModelRef::ProductPrice { product_id, .. } => self.flush(*product_id),
            ModelRef::Category { .. } | ModelRef::TaxClass { .. } => {}
        }
    }
}
