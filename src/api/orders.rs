use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::extract::AppJson;
use crate::engine::queue::enqueue_order;
use crate::error::AppError;
use crate::models::order::{OrderStatus, parse_order_id};
use crate::state::AppState;
use crate::store::NewOrder;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", post(create_order))
        .route("/orders/metrics", get(order_metrics))
        .route("/orders/:id/status", get(order_status))
}

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: i64,
    pub item_ids: Vec<i64>,
    pub total_amount: Decimal,
}

#[derive(Serialize)]
pub struct CreateOrderResponse {
    pub message: &'static str,
    pub order_id: String,
}

#[derive(Serialize)]
pub struct OrderStatusResponse {
    pub order_id: String,
    pub status: OrderStatus,
}

#[derive(Serialize)]
pub struct OrderMetricsResponse {
    pub total_orders_processed: u64,
    pub average_processing_time_seconds: f64,
    pub order_status_counts: BTreeMap<OrderStatus, u64>,
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), AppError> {
    let mut errors = Vec::new();
    if payload.item_ids.is_empty() {
        errors.push("item_ids cannot be empty".to_string());
    }
    if payload.total_amount < Decimal::ZERO {
        errors.push("total_amount cannot be negative".to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let order = state.store.insert(NewOrder {
        user_id: payload.user_id,
        item_ids: payload.item_ids,
        total_amount: payload.total_amount,
    });
    enqueue_order(&state, order.order_id)?;

    info!(order_id = order.order_id, user_id = order.user_id, "order received");

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            message: "Order received.",
            order_id: order.display_id(),
        }),
    ))
}

async fn order_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderStatusResponse>, AppError> {
    let order_id = parse_order_id(&id)
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

    let order = state
        .store
        .get(order_id)
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

    Ok(Json(OrderStatusResponse {
        order_id: order.display_id(),
        status: order.status,
    }))
}

async fn order_metrics(State(state): State<Arc<AppState>>) -> Json<OrderMetricsResponse> {
    let metrics = state.store.metrics();

    Json(OrderMetricsResponse {
        total_orders_processed: metrics.total_orders,
        average_processing_time_seconds: metrics.average_processing_seconds,
        order_status_counts: metrics.status_counts,
    })
}
