use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;

use crate::models::order::{Order, OrderStatus};

/// Input for a new record; id, status, and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i64,
    pub item_ids: Vec<i64>,
    pub total_amount: Decimal,
}

/// Aggregates over all persisted orders, computed on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreMetrics {
    pub total_orders: u64,
    pub status_counts: BTreeMap<OrderStatus, u64>,
    pub average_processing_seconds: f64,
}

/// Flat table of Order records keyed by order id. Ids are assigned from a
/// monotonic sequence starting at 1. Records are never deleted here.
pub struct OrderStore {
    orders: DashMap<i64, Order>,
    next_id: AtomicI64,
}

impl OrderStore {
    pub fn new() -> Self {
        Self {
            orders: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn insert(&self, new_order: NewOrder) -> Order {
        let now = Utc::now();
        let order = Order {
            order_id: self.next_id.fetch_add(1, Ordering::Relaxed),
            user_id: new_order.user_id,
            item_ids: new_order.item_ids,
            total_amount: new_order.total_amount,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        self.orders.insert(order.order_id, order.clone());
        order
    }

    pub fn get(&self, order_id: i64) -> Option<Order> {
        self.orders.get(&order_id).map(|entry| entry.value().clone())
    }

    /// Persist a status transition, refreshing `updated_at`. Returns the
    /// updated record, or `None` when no record matches.
    pub fn set_status(&self, order_id: i64, status: OrderStatus) -> Option<Order> {
        let mut order = self.orders.get_mut(&order_id)?;
        order.status = status;
        order.updated_at = Utc::now();
        Some(order.clone())
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn metrics(&self) -> StoreMetrics {
        let orders: Vec<Order> = self
            .orders
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        let mut status_counts = BTreeMap::new();
        for order in &orders {
            *status_counts.entry(order.status).or_insert(0u64) += 1;
        }

        StoreMetrics {
            total_orders: orders.len() as u64,
            status_counts,
            average_processing_seconds: average_processing_seconds(&orders),
        }
    }
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Mean of `updated_at - created_at` in seconds over Completed orders only;
/// 0 when no order is Completed.
pub fn average_processing_seconds(orders: &[Order]) -> f64 {
    let completed: Vec<&Order> = orders
        .iter()
        .filter(|order| order.status == OrderStatus::Completed)
        .collect();

    if completed.is_empty() {
        return 0.0;
    }

    let total_seconds: f64 = completed
        .iter()
        .map(|order| {
            (order.updated_at - order.created_at).num_milliseconds() as f64 / 1000.0
        })
        .sum();

    total_seconds / completed.len() as f64
}

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, Utc};

    use super::*;

    fn new_order(amount: &str) -> NewOrder {
        NewOrder {
            user_id: 1,
            item_ids: vec![1, 2],
            total_amount: amount.parse().unwrap(),
        }
    }

    fn completed_order(order_id: i64, processing_seconds: i64) -> Order {
        let created_at = Utc::now();
        Order {
            order_id,
            user_id: 1,
            item_ids: vec![1],
            total_amount: Decimal::ZERO,
            status: OrderStatus::Completed,
            created_at,
            updated_at: created_at + ChronoDuration::seconds(processing_seconds),
        }
    }

    #[test]
    fn insert_assigns_sequential_ids_starting_at_one() {
        let store = OrderStore::new();
        let first = store.insert(new_order("10.00"));
        let second = store.insert(new_order("5.50"));

        assert_eq!(first.order_id, 1);
        assert_eq!(second.order_id, 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn insert_starts_orders_pending_with_equal_timestamps() {
        let store = OrderStore::new();
        let order = store.insert(new_order("10.00"));

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.created_at, order.updated_at);
    }

    #[test]
    fn set_status_refreshes_updated_at() {
        let store = OrderStore::new();
        let order = store.insert(new_order("10.00"));

        let updated = store
            .set_status(order.order_id, OrderStatus::Processing)
            .unwrap();

        assert_eq!(updated.status, OrderStatus::Processing);
        assert!(updated.updated_at >= updated.created_at);
    }

    #[test]
    fn set_status_on_missing_record_returns_none() {
        let store = OrderStore::new();
        assert!(store.set_status(99, OrderStatus::Processing).is_none());
    }

    #[test]
    fn metrics_counts_sum_to_total() {
        let store = OrderStore::new();
        store.insert(new_order("1.00"));
        let second = store.insert(new_order("2.00"));
        store.insert(new_order("3.00"));
        store.set_status(second.order_id, OrderStatus::Processing);

        let metrics = store.metrics();
        assert_eq!(metrics.total_orders, 3);
        assert_eq!(metrics.status_counts[&OrderStatus::Pending], 2);
        assert_eq!(metrics.status_counts[&OrderStatus::Processing], 1);
        assert_eq!(
            metrics.status_counts.values().sum::<u64>(),
            metrics.total_orders
        );
    }

    #[test]
    fn average_processing_is_zero_without_completed_orders() {
        let store = OrderStore::new();
        store.insert(new_order("1.00"));

        assert_eq!(store.metrics().average_processing_seconds, 0.0);
    }

    #[test]
    fn average_processing_is_mean_over_completed_only() {
        let mut pending = completed_order(3, 100);
        pending.status = OrderStatus::Pending;
        let orders = vec![completed_order(1, 4), completed_order(2, 6), pending];

        assert_eq!(average_processing_seconds(&orders), 5.0);
    }
}
