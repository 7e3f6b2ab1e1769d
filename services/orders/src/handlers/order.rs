use axum::{
    Json,
    extract::{Path, Query, State},
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_core::serde::to_rfc3339_ms;
use storefront_domain::order::{OrderStatus, PaymentMethod, PaymentStatus};

use crate::domain::types::OrderLine;
use crate::error::OrdersServiceError;
use crate::state::AppState;
use crate::usecase::lookup::{OrderHistoryUseCase, TrackOrderUseCase};
use crate::usecase::order::{
    CreateOrderInput, CreateOrderUseCase, CustomerDetails, OrderItemInput,
};

/// Customer-facing view of one order line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub tracking_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: Option<String>,
    pub product_id: String,
    pub product_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub product_price: Decimal,
    pub product_image_url: Option<String>,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<OrderLine> for OrderResponse {
    fn from(line: OrderLine) -> Self {
        Self {
            id: line.id,
            tracking_id: line.tracking_id,
            customer_name: line.customer.name,
            customer_email: line.customer.email.into(),
            customer_phone: line.customer.phone,
            customer_address: line.customer.address,
            product_id: line.product.product_id,
            product_name: line.product.name,
            product_price: line.product.unit_price,
            product_image_url: line.product.image_url,
            quantity: line.quantity,
            total_amount: line.total_amount,
            status: line.status,
            payment_method: line.payment_method,
            payment_status: line.payment_status,
            notes: line.notes,
            created_at: line.created_at,
            updated_at: line.updated_at,
        }
    }
}

// ── POST /orders ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDataRequest {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub email: String,
    pub order_data: OrderDataRequest,
    pub items: Vec<OrderItemRequest>,
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub success: bool,
    pub tracking_ids: Vec<String>,
    pub replayed: bool,
}

pub async fn create_order(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<CreateOrderRequest>, OrdersServiceError>,
) -> Result<Json<CreateOrderResponse>, OrdersServiceError> {
    run_create(&state, body).await.map(Json)
}

pub(crate) async fn run_create(
    state: &AppState,
    body: CreateOrderRequest,
) -> Result<CreateOrderResponse, OrdersServiceError> {
    let usecase = CreateOrderUseCase {
        orders: state.order_repo(),
        challenges: state.passcode_repo(),
        settings: state.settings(),
        notifier: state.notifier(),
        clock: state.clock(),
    };
    let output = usecase
        .execute(CreateOrderInput {
            email: body.email,
            customer: CustomerDetails {
                name: body.order_data.name,
                phone: body.order_data.phone,
                address: body.order_data.address,
            },
            payment_method: body.order_data.payment_method,
            notes: body.order_data.notes,
            items: body
                .items
                .into_iter()
                .map(|item| OrderItemInput {
                    product_id: item.id,
                    name: item.name,
                    price: item.price,
                    image_url: item.image_url,
                    quantity: item.quantity,
                })
                .collect(),
            idempotency_key: body.idempotency_key,
        })
        .await?;
    Ok(CreateOrderResponse {
        success: true,
        tracking_ids: output.tracking_ids,
        replayed: output.replayed,
    })
}

// ── GET /orders/track/{tracking_id} ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackOrderRequest {
    pub tracking_id: String,
}

#[derive(Debug, Serialize)]
pub struct TrackOrderResponse {
    pub success: bool,
    pub order: OrderResponse,
}

pub async fn track_order(
    State(state): State<AppState>,
    WithRejection(Path(tracking_id), _): WithRejection<Path<String>, OrdersServiceError>,
) -> Result<Json<TrackOrderResponse>, OrdersServiceError> {
    run_track(&state, TrackOrderRequest { tracking_id })
        .await
        .map(Json)
}

pub(crate) async fn run_track(
    state: &AppState,
    body: TrackOrderRequest,
) -> Result<TrackOrderResponse, OrdersServiceError> {
    let usecase = TrackOrderUseCase {
        orders: state.order_repo(),
    };
    let order = usecase
        .execute(&body.tracking_id)
        .await?
        .ok_or(OrdersServiceError::OrderNotFound)?;
    Ok(TrackOrderResponse {
        success: true,
        order: order.into(),
    })
}

// ── GET /orders?email= ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct OrderHistoryRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct OrderHistoryResponse {
    pub success: bool,
    pub orders: Vec<OrderResponse>,
}

pub async fn order_history(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<OrderHistoryRequest>, OrdersServiceError>,
) -> Result<Json<OrderHistoryResponse>, OrdersServiceError> {
    run_history(&state, query).await.map(Json)
}

pub(crate) async fn run_history(
    state: &AppState,
    body: OrderHistoryRequest,
) -> Result<OrderHistoryResponse, OrdersServiceError> {
    let usecase = OrderHistoryUseCase {
        orders: state.order_repo(),
        challenges: state.passcode_repo(),
        clock: state.clock(),
        require_verification: state.history_requires_verification,
    };
    let orders = usecase.execute(&body.email).await?;
    Ok(OrderHistoryResponse {
        success: true,
        orders: orders.into_iter().map(OrderResponse::from).collect(),
    })
}
