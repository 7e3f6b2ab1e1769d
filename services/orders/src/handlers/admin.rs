use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_auth_types::AdminIdentity;
use storefront_domain::order::{OrderStatus, PaymentStatus};

use crate::domain::types::StatusChange;
use crate::error::OrdersServiceError;
use crate::handlers::order::OrderResponse;
use crate::state::AppState;
use crate::usecase::admin::{DeleteOrderUseCase, UpdateOrderStatusUseCase};

// ── PATCH /admin/orders/{id}/status ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
}

#[derive(Debug, Serialize)]
pub struct UpdateOrderStatusResponse {
    pub success: bool,
    pub order: OrderResponse,
}

pub async fn update_order_status(
    State(state): State<AppState>,
    admin: AdminIdentity,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, OrdersServiceError>,
    WithRejection(Json(body), _): WithRejection<Json<UpdateOrderStatusRequest>, OrdersServiceError>,
) -> Result<Json<UpdateOrderStatusResponse>, OrdersServiceError> {
    let usecase = UpdateOrderStatusUseCase {
        orders: state.order_repo(),
        settings: state.settings(),
        notifier: state.notifier(),
        clock: state.clock(),
    };
    let order = usecase
        .execute(
            id,
            StatusChange {
                status: body.status,
                payment_status: body.payment_status,
            },
        )
        .await?;
    tracing::info!(admin = %admin.user_id, order = %id, "order status updated");
    Ok(Json(UpdateOrderStatusResponse {
        success: true,
        order: order.into(),
    }))
}

// ── DELETE /admin/orders/{id} ────────────────────────────────────────────────

pub async fn delete_order(
    State(state): State<AppState>,
    admin: AdminIdentity,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, OrdersServiceError>,
) -> Result<StatusCode, OrdersServiceError> {
    let usecase = DeleteOrderUseCase {
        orders: state.order_repo(),
    };
    usecase.execute(id).await?;
    tracing::info!(admin = %admin.user_id, order = %id, "order deleted");
    Ok(StatusCode::NO_CONTENT)
}
