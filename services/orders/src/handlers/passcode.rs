use axum::{Json, extract::State};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::error::OrdersServiceError;
use crate::handlers::MessageResponse;
use crate::state::AppState;
use crate::usecase::passcode::{
    IssuePasscodeInput, IssuePasscodeUseCase, VerifyPasscodeInput, VerifyPasscodeUseCase,
};

// ── POST /passcodes ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SendPasscodeRequest {
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

pub async fn issue_passcode(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<SendPasscodeRequest>, OrdersServiceError>,
) -> Result<Json<MessageResponse>, OrdersServiceError> {
    run_issue(&state, body).await.map(Json)
}

pub(crate) async fn run_issue(
    state: &AppState,
    body: SendPasscodeRequest,
) -> Result<MessageResponse, OrdersServiceError> {
    let usecase = IssuePasscodeUseCase {
        challenges: state.passcode_repo(),
        settings: state.settings(),
        notifier: state.notifier(),
        clock: state.clock(),
    };
    usecase
        .execute(IssuePasscodeInput {
            email: body.email,
            phone: body.phone,
        })
        .await?;
    Ok(MessageResponse::ok("verification code sent"))
}

// ── POST /passcodes/verify ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct VerifyPasscodeRequest {
    pub email: String,
    pub otp: String,
}

pub async fn verify_passcode(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<VerifyPasscodeRequest>, OrdersServiceError>,
) -> Result<Json<MessageResponse>, OrdersServiceError> {
    run_verify(&state, body).await.map(Json)
}

pub(crate) async fn run_verify(
    state: &AppState,
    body: VerifyPasscodeRequest,
) -> Result<MessageResponse, OrdersServiceError> {
    let usecase = VerifyPasscodeUseCase {
        challenges: state.passcode_repo(),
        clock: state.clock(),
    };
    usecase
        .execute(VerifyPasscodeInput {
            email: body.email,
            code: body.otp,
        })
        .await?;
    Ok(MessageResponse::ok("email verified"))
}
