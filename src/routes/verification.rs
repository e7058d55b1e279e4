//! # 이메일 인증과 회원가입
//!
//! - `POST /api/verify` → 인증 코드 메일 발송
//! - `POST /api/verify/code` → 코드 확인
//! - `POST /api/verify/signup` → 확인된 코드로 가입

use axum::{extract::State, http::StatusCode, Json};

use crate::{error::AppError, models::*, routes::AppState, services::verification};

pub async fn send_code(
    State(state): State<AppState>,
    Json(req): Json<EmailVerifyRequest>,
) -> Result<StatusCode, AppError> {
    verification::send_code(&state, &req.email).await?;
    Ok(StatusCode::OK)
}

pub async fn verify_code(
    State(state): State<AppState>,
    Json(req): Json<CodeVerifyRequest>,
) -> Result<StatusCode, AppError> {
    verification::verify_code(&state, &req).await?;
    Ok(StatusCode::OK)
}

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<StatusCode, AppError> {
    verification::signup(&state, &req).await?;
    Ok(StatusCode::CREATED)
}
