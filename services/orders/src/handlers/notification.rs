use axum::{Json, extract::State};
use axum_extra::extract::WithRejection;
use rust_decimal::Decimal;
use serde::Deserialize;

use storefront_domain::order::{OrderStatus, PaymentMethod};

use crate::error::OrdersServiceError;
use crate::handlers::SuccessResponse;
use crate::state::AppState;
use crate::usecase::notify::{
    ConfirmationItem, SendConfirmationInput, SendConfirmationUseCase, SendStatusUpdateInput,
    SendStatusUpdateUseCase,
};

// ── POST /notifications/confirmation ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationItemRequest {
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendConfirmationRequest {
    pub email: String,
    pub order_items: Vec<ConfirmationItemRequest>,
    #[serde(default)]
    pub tracking_ids: Vec<String>,
    pub payment_method: PaymentMethod,
    pub customer_name: String,
    #[serde(default)]
    pub customer_address: Option<String>,
}

pub async fn send_confirmation(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<SendConfirmationRequest>, OrdersServiceError>,
) -> Result<Json<SuccessResponse>, OrdersServiceError> {
    run_confirmation(&state, body).await.map(Json)
}

pub(crate) async fn run_confirmation(
    state: &AppState,
    body: SendConfirmationRequest,
) -> Result<SuccessResponse, OrdersServiceError> {
    let usecase = SendConfirmationUseCase {
        settings: state.settings(),
        notifier: state.notifier(),
    };
    usecase
        .execute(SendConfirmationInput {
            email: body.email,
            items: body
                .order_items
                .into_iter()
                .map(|item| ConfirmationItem {
                    name: item.name,
                    price: item.price,
                    quantity: item.quantity,
                })
                .collect(),
            tracking_ids: body.tracking_ids,
            payment_method: body.payment_method,
            customer_name: body.customer_name,
            customer_address: body.customer_address,
        })
        .await?;
    Ok(SuccessResponse::ok())
}

// ── POST /notifications/status-update ────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailsRequest {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub total_amount: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendStatusUpdateRequest {
    pub email: String,
    #[serde(default)]
    pub order_details: OrderDetailsRequest,
    pub new_status: OrderStatus,
    pub tracking_id: String,
}

pub async fn send_status_update(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<SendStatusUpdateRequest>, OrdersServiceError>,
) -> Result<Json<SuccessResponse>, OrdersServiceError> {
    run_status_update(&state, body).await.map(Json)
}

pub(crate) async fn run_status_update(
    state: &AppState,
    body: SendStatusUpdateRequest,
) -> Result<SuccessResponse, OrdersServiceError> {
    let usecase = SendStatusUpdateUseCase {
        settings: state.settings(),
        notifier: state.notifier(),
    };
    usecase
        .execute(SendStatusUpdateInput {
            email: body.email,
            tracking_id: body.tracking_id,
            status: body.new_status,
            customer_name: body.order_details.customer_name,
            product_name: body.order_details.product_name,
            quantity: body.order_details.quantity,
            total_amount: body.order_details.total_amount,
        })
        .await?;
    Ok(SuccessResponse::ok())
}
