use tokio::sync::mpsc;

use crate::config::FulfillmentConfig;
use crate::engine::queue::QueueCommand;
use crate::observability::metrics::Metrics;
use crate::store::OrderStore;

/// Shared state handed to request handlers and the worker. Constructed once at
/// process start; the returned receiver belongs to the single worker task.
pub struct AppState {
    pub store: OrderStore,
    pub queue_tx: mpsc::UnboundedSender<QueueCommand>,
    pub fulfillment: FulfillmentConfig,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(
        fulfillment: FulfillmentConfig,
    ) -> (Self, mpsc::UnboundedReceiver<QueueCommand>) {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();

        (
            Self {
                store: OrderStore::new(),
                queue_tx,
                fulfillment,
                metrics: Metrics::new(),
            },
            queue_rx,
        )
    }
}
