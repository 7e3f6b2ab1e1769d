//! Single multiplexed entry point: `{ "action": "<name>", ...fields }`.
//!
//! The body decodes into [`ActionRequest`] and every variant is routed to the
//! same code path as its dedicated REST route.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::error::OrdersServiceError;
use crate::handlers::notification::{
    SendConfirmationRequest, SendStatusUpdateRequest, run_confirmation, run_status_update,
};
use crate::handlers::order::{
    CreateOrderRequest, OrderHistoryRequest, TrackOrderRequest, run_create, run_history,
    run_track,
};
use crate::handlers::passcode::{
    SendPasscodeRequest, VerifyPasscodeRequest, run_issue, run_verify,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum ActionRequest {
    Send(SendPasscodeRequest),
    Verify(VerifyPasscodeRequest),
    CreateOrder(CreateOrderRequest),
    SendConfirmation(SendConfirmationRequest),
    SendStatusUpdate(SendStatusUpdateRequest),
    TrackOrder(TrackOrderRequest),
    GetOrderHistory(OrderHistoryRequest),
}

// ── POST /functions/order-verification ───────────────────────────────────────

pub async fn dispatch_action(
    State(state): State<AppState>,
    WithRejection(Json(action), _): WithRejection<Json<ActionRequest>, OrdersServiceError>,
) -> Result<Response, OrdersServiceError> {
    let response = match action {
        ActionRequest::Send(body) => Json(run_issue(&state, body).await?).into_response(),
        ActionRequest::Verify(body) => Json(run_verify(&state, body).await?).into_response(),
        ActionRequest::CreateOrder(body) => Json(run_create(&state, body).await?).into_response(),
        ActionRequest::SendConfirmation(body) => {
            Json(run_confirmation(&state, body).await?).into_response()
        }
        ActionRequest::SendStatusUpdate(body) => {
            Json(run_status_update(&state, body).await?).into_response()
        }
        ActionRequest::TrackOrder(body) => Json(run_track(&state, body).await?).into_response(),
        ActionRequest::GetOrderHistory(body) => {
            Json(run_history(&state, body).await?).into_response()
        }
    };
    Ok(response)
}
