use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Prefix for the human-facing order identifier, e.g. numeric id 7 -> "ORD7".
pub const DISPLAY_ID_PREFIX: &str = "ORD";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
}

impl OrderStatus {
    /// Next status in the fixed lifecycle, `None` once Completed.
    /// Transitions only move forward through Pending -> Processing -> Completed.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Processing),
            OrderStatus::Processing => Some(OrderStatus::Completed),
            OrderStatus::Completed => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: i64,
    pub user_id: i64,
    pub item_ids: Vec<i64>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn display_id(&self) -> String {
        display_id(self.order_id)
    }
}

pub fn display_id(order_id: i64) -> String {
    format!("{DISPLAY_ID_PREFIX}{order_id}")
}

/// Parse an order identifier from a path segment. Accepts the bare numeric id
/// as well as the "ORD"-prefixed display form.
pub fn parse_order_id(raw: &str) -> Option<i64> {
    let digits = raw.strip_prefix(DISPLAY_ID_PREFIX).unwrap_or(raw);
    digits.parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_id_prefixes_numeric_id() {
        assert_eq!(display_id(7), "ORD7");
        assert_eq!(display_id(1042), "ORD1042");
    }

    #[test]
    fn parse_accepts_bare_and_prefixed_ids() {
        assert_eq!(parse_order_id("7"), Some(7));
        assert_eq!(parse_order_id("ORD7"), Some(7));
        assert_eq!(parse_order_id("ORD"), None);
        assert_eq!(parse_order_id("seven"), None);
    }

    #[test]
    fn status_advances_forward_only() {
        assert_eq!(OrderStatus::Pending.next(), Some(OrderStatus::Processing));
        assert_eq!(OrderStatus::Processing.next(), Some(OrderStatus::Completed));
        assert_eq!(OrderStatus::Completed.next(), None);
    }

    #[test]
    fn status_ordering_matches_lifecycle() {
        assert!(OrderStatus::Pending < OrderStatus::Processing);
        assert!(OrderStatus::Processing < OrderStatus::Completed);
    }
}
