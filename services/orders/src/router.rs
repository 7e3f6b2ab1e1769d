use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use storefront_core::health::healthz;
use storefront_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    action::dispatch_action,
    admin::{delete_order, update_order_status},
    health::readyz,
    notification::{send_confirmation, send_status_update},
    order::{create_order, order_history, track_order},
    passcode::{issue_passcode, verify_passcode},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Passcodes
        .route("/passcodes", post(issue_passcode))
        .route("/passcodes/verify", post(verify_passcode))
        // Orders
        .route("/orders", post(create_order).get(order_history))
        .route("/orders/track/{tracking_id}", get(track_order))
        // Notifications
        .route("/notifications/confirmation", post(send_confirmation))
        .route("/notifications/status-update", post(send_status_update))
        // Admin
        .route("/admin/orders/{id}/status", patch(update_order_status))
        .route("/admin/orders/{id}", delete(delete_order))
        // Multiplexed action endpoint
        .route("/functions/order-verification", post(dispatch_action))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
