use serde::Serialize;

pub mod action;
pub mod admin;
pub mod health;
pub mod notification;
pub mod order;
pub mod passcode;

/// `{ "success": true, "message": "..." }`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

impl MessageResponse {
    pub fn ok(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

/// `{ "success": true }`
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
