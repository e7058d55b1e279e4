//! # 이메일 인증 / 회원가입 서비스
//!
//! 1. `send_code`: 6자리 코드를 메일로 보내고 저장
//! 2. `verify_code`: 10분 안에 입력한 코드가 맞으면 인증 완료 표시
//! 3. `signup`: 인증 완료 후 20분 안에 가입 요청을 보내면 회원 생성

use rand_core::{OsRng, RngCore};
use chrono::{Duration, Utc};

use crate::{
    db,
    error::{AppError, ErrorCode},
    models::*,
    routes::AppState,
    services::{auth::email_local_part, mail::verification_mail, member, parse_timestamp},
};

/// 코드 입력 유효 시간
pub const CODE_VERIFY_MINUTES: i64 = 10;
/// 코드 발급 후 가입 완료까지 허용되는 시간
pub const SIGNUP_MINUTES: i64 = 20;

pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|part| !part.is_empty())
}

/// 8~16자, 영문과 숫자만, 영문과 숫자를 각각 하나 이상 포함
pub fn is_valid_password(password: &str) -> bool {
    let len = password.chars().count();
    (8..=16).contains(&len)
        && password.chars().all(|c| c.is_ascii_alphanumeric())
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}

fn validate_email(email: &str) -> Result<(), AppError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(AppError::validation("email", "이메일 형식에 맞게 입력해주세요."))
    }
}

fn generate_code() -> String {
    format!("{:06}", OsRng.next_u32() % 1_000_000)
}

pub async fn send_code(state: &AppState, email: &str) -> Result<(), AppError> {
    let email = email.trim();
    validate_email(email)?;

    if db::members::find_by_email(&state.pool, email).await?.is_some() {
        return Err(ErrorCode::SignupMemberExists.into());
    }

    let code = generate_code();
    db::verifications::delete_by_email(&state.pool, email).await?;
    db::verifications::create(&state.pool, email, &code).await?;

    let (subject, body) = verification_mail(&code);
    if let Err(e) = state.mailer.send(email, &subject, &body).await {
        tracing::error!("Failed to send verification mail: {}", e);
        db::verifications::delete_by_email(&state.pool, email).await?;
        return Err(ErrorCode::SignupMailSendFailed.into());
    }

    Ok(())
}

pub async fn verify_code(state: &AppState, req: &CodeVerifyRequest) -> Result<(), AppError> {
    let verification = db::verifications::find_latest(&state.pool, req.email.trim())
        .await?
        .ok_or(ErrorCode::SignupCodeNotExists)?;

    if verification.code != req.code.trim() {
        return Err(ErrorCode::SignupCodeNotMatched.into());
    }
    let issued_at = parse_timestamp(&verification.created_at)?;
    if Utc::now() - issued_at > Duration::minutes(CODE_VERIFY_MINUTES) {
        return Err(ErrorCode::SignupCodeExpired.into());
    }

    db::verifications::mark_verified(&state.pool, &verification.id).await
}

pub async fn signup(state: &AppState, req: &SignupRequest) -> Result<(), AppError> {
    let email = req.email.trim();
    validate_email(email)?;
    if !is_valid_password(&req.password) {
        return Err(AppError::validation(
            "password",
            "비밀번호는 영문과 숫자를 포함한 8~16자여야 합니다.",
        ));
    }

    let verification = db::verifications::find_latest(&state.pool, email)
        .await?
        .ok_or(ErrorCode::SignupCodeNotExists)?;
    // 가입 가능 시간이 지난 인증은 인증되지 않은 것으로 봅니다.
    let issued_at = parse_timestamp(&verification.created_at)?;
    if !verification.verified || Utc::now() - issued_at > Duration::minutes(SIGNUP_MINUTES) {
        return Err(ErrorCode::SignupCodeNotVerified.into());
    }
    if verification.code != req.code.trim() {
        return Err(ErrorCode::SignupCodeNotMatched.into());
    }

    if db::members::find_by_email(&state.pool, email).await?.is_some() {
        return Err(ErrorCode::SignupMemberExists.into());
    }

    let password_hash = member::hash_password(&req.password)?;

    let mut tx = state.pool.begin().await?;
    db::verifications::delete_by_email(&mut *tx, email).await?;
    let username = member::unique_username(&mut tx, email_local_part(email)).await?;
    let created =
        db::members::create_member(&mut tx, email, &username, &password_hash, Platform::Server)
            .await?;
    tx.commit().await?;

    tracing::info!(member_id = %created.id, "member signed up");
    Ok(())
}
