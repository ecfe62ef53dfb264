//! Model signals
//!
//! Storage backends announce every write with a [`ModelSignal`]. Receivers
//! are connected while the bus is still owned exclusively; once it is shared
//! behind an `Arc` the set of receivers is fixed.

use shop_types::RecordId;
use std::sync::Arc;
use tracing::trace;

/// The record a signal is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelRef {
    Product { id: RecordId },
    ProductPrice { id: RecordId, product_id: RecordId },
    Category { id: RecordId },
    TaxClass { id: RecordId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSignal {
    /// Sent after an insert or update; `created` is true for inserts
    PostSave { model: ModelRef, created: bool },
    PostDelete { model: ModelRef },
}

impl ModelSignal {
    pub fn saved(model: ModelRef, created: bool) -> Self {
        ModelSignal::PostSave { model, created }
    }

    pub fn deleted(model: ModelRef) -> Self {
        ModelSignal::PostDelete { model }
    }

    pub fn model(&self) -> &ModelRef {
        match self {
            ModelSignal::PostSave { model, .. } | ModelSignal::PostDelete { model } => model,
        }
    }
}

/// Reacts to model signals
pub trait SignalReceiver: Send + Sync {
    fn receive(&self, signal: &ModelSignal);
}

impl<F> SignalReceiver for F
where
    F: Fn(&ModelSignal) + Send + Sync,
{
    fn receive(&self, signal: &ModelSignal) {
        self(signal)
    }
}

/// Synchronous fan-out of model signals
#[derive(Default)]
pub struct SignalBus {
    receivers: Vec<Arc<dyn SignalReceiver>>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self, receiver: Arc<dyn SignalReceiver>) {
        self.receivers.push(receiver);
    }

    /// Deliver `signal` to every receiver in connection order
    pub fn send(&self, signal: ModelSignal) {
        trace!(?signal, receivers = self.receivers.len(), "Dispatching model signal");
        for receiver in &self.receivers {
            receiver.receive(&signal);
        }
    }

    pub fn receiver_count(&self) -> usize {
        self.receivers.len()
    }
}

impl std::fmt::Debug for SignalBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalBus")
            .field("receivers", &self.receivers.len())
            .finish()
    }
}
