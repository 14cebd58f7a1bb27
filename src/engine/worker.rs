use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::engine::queue::QueueCommand;
use crate::error::AppError;
use crate::models::order::OrderStatus;
use crate::state::AppState;

/// The single fulfillment worker. Started once at process start and runs until
/// the shutdown sentinel arrives; a failed item never ends the loop.
pub async fn run_fulfillment_worker(
    state: Arc<AppState>,
    mut queue_rx: mpsc::UnboundedReceiver<QueueCommand>,
) {
    info!("fulfillment worker started");

    while let Some(command) = queue_rx.recv().await {
        let order_id = match command {
            QueueCommand::Shutdown => break,
            QueueCommand::Process(order_id) => order_id,
        };

        state.metrics.orders_in_queue.dec();

        let start = Instant::now();
        match fulfill_order(&state, order_id).await {
            Ok(()) => {
                let elapsed = start.elapsed().as_secs_f64();
                state
                    .metrics
                    .fulfillment_latency_seconds
                    .with_label_values(&["success"])
                    .observe(elapsed);
                state
                    .metrics
                    .fulfillments_total
                    .with_label_values(&["success"])
                    .inc();
            }
            Err(err) => {
                let elapsed = start.elapsed().as_secs_f64();
                state
                    .metrics
                    .fulfillment_latency_seconds
                    .with_label_values(&["abandoned"])
                    .observe(elapsed);
                state
                    .metrics
                    .fulfillments_total
                    .with_label_values(&["abandoned"])
                    .inc();
                warn!(order_id, error = %err, "abandoning order");
            }
        }
    }

    info!("fulfillment worker stopped");
}

/// Drive one order through Pending -> Processing -> Completed with the
/// configured delays, persisting each transition. A record that vanished
/// between enqueue and dequeue aborts the iteration.
async fn fulfill_order(state: &AppState, order_id: i64) -> Result<(), AppError> {
    state
        .store
        .get(order_id)
        .ok_or_else(|| AppError::NotFound(format!("order {order_id} not found")))?;

    sleep(state.fulfillment.processing_delay).await;
    let order = state
        .store
        .set_status(order_id, OrderStatus::Processing)
        .ok_or_else(|| AppError::NotFound(format!("order {order_id} vanished")))?;
    info!(order_id, status = ?order.status, "order transition persisted");

    sleep(state.fulfillment.completion_delay).await;
    let order = state
        .store
        .set_status(order_id, OrderStatus::Completed)
        .ok_or_else(|| AppError::NotFound(format!("order {order_id} vanished")))?;
    info!(order_id, status = ?order.status, "order transition persisted");

    Ok(())
}
