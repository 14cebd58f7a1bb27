use crate::error::AppError;
use crate::state::AppState;

/// Messages carried by the fulfillment queue. `Shutdown` is the sentinel that
/// ends the worker loop; nothing else terminates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueCommand {
    Process(i64),
    Shutdown,
}

pub fn enqueue_order(state: &AppState, order_id: i64) -> Result<(), AppError> {
    state
        .queue_tx
        .send(QueueCommand::Process(order_id))
        .map_err(|err| AppError::Internal(format!("fulfillment queue send failed: {err}")))?;

    state.metrics.orders_in_queue.inc();
    Ok(())
}

/// Ask the worker to exit once it reaches the sentinel. Send failure means the
/// worker is already gone, which is fine during shutdown.
pub fn request_shutdown(state: &AppState) {
    let _ = state.queue_tx.send(QueueCommand::Shutdown);
}

#[cfg(test)]
mod tests {
    use crate::config::FulfillmentConfig;
    use crate::state::AppState;

    use super::*;

    fn test_state() -> (AppState, tokio::sync::mpsc::UnboundedReceiver<QueueCommand>) {
        AppState::new(FulfillmentConfig {
            processing_delay: std::time::Duration::from_millis(1),
            completion_delay: std::time::Duration::from_millis(1),
        })
    }

    #[tokio::test]
    async fn dequeues_in_fifo_order_then_sentinel() {
        let (state, mut rx) = test_state();

        enqueue_order(&state, 1).unwrap();
        enqueue_order(&state, 2).unwrap();
        enqueue_order(&state, 3).unwrap();
        request_shutdown(&state);

        assert_eq!(rx.recv().await, Some(QueueCommand::Process(1)));
        assert_eq!(rx.recv().await, Some(QueueCommand::Process(2)));
        assert_eq!(rx.recv().await, Some(QueueCommand::Process(3)));
        assert_eq!(rx.recv().await, Some(QueueCommand::Shutdown));
    }

    #[tokio::test]
    async fn enqueue_tracks_queue_depth_gauge() {
        let (state, _rx) = test_state();

        enqueue_order(&state, 1).unwrap();
        enqueue_order(&state, 2).unwrap();

        assert_eq!(state.metrics.orders_in_queue.get(), 2);
    }
}
