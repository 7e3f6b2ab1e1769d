use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use storefront_domain::email::EmailError;

use crate::domain::notification::DispatchError;

/// Orders service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum OrdersServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("please wait {seconds_remaining} seconds before requesting a new code")]
    CooldownActive { seconds_remaining: u64 },
    #[error("invalid or expired passcode")]
    InvalidOrExpired,
    #[error("email has not been verified")]
    NotVerified,
    #[error("order not found")]
    OrderNotFound,
    #[error("notification could not be delivered")]
    Dispatch(#[from] DispatchError),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl OrdersServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::CooldownActive { .. } => "COOLDOWN_ACTIVE",
            Self::InvalidOrExpired => "INVALID_OR_EXPIRED",
            Self::NotVerified => "NOT_VERIFIED",
            Self::OrderNotFound => "ORDER_NOT_FOUND",
            Self::Dispatch(_) => "DISPATCH_FAILED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidOrExpired => StatusCode::BAD_REQUEST,
            Self::CooldownActive { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::NotVerified => StatusCode::FORBIDDEN,
            Self::OrderNotFound => StatusCode::NOT_FOUND,
            Self::Dispatch(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<EmailError> for OrdersServiceError {
    fn from(e: EmailError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<JsonRejection> for OrdersServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for OrdersServiceError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for OrdersServiceError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for OrdersServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        // TraceLayer records every request; only infrastructure failures need
        // their detail logged here since the body carries a generic message.
        match &self {
            Self::Internal(e) => tracing::error!(error = ?e, kind = "INTERNAL", "internal error"),
            Self::Dispatch(e) => {
                tracing::error!(error = %e, kind = "DISPATCH_FAILED", "notification dispatch failed")
            }
            _ => {}
        }
        let mut body = serde_json::json!({
            "success": false,
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::CooldownActive { seconds_remaining } = self {
            body["cooldownRemaining"] = serde_json::json!(seconds_remaining);
        }
        (status, axum::Json(body)).into_response()
    }
}
