//! # 로그인 세션 서비스
//!
//! access 토큰은 응답 헤더로, refresh 토큰은 HttpOnly 쿠키로 내려갑니다.
//! refresh 토큰은 해시로 저장되며 이메일당 하나만 유효합니다.
//!
//! 토큰 갱신(`refresh`) 흐름:
//! 1. 쿠키의 refresh 토큰 서명/만료/종류 검증
//! 2. 저장소에 같은 해시가 있는지 확인 (로그아웃·교체된 토큰 거부)
//! 3. 새 access 토큰 발급
//! 4. 남은 수명이 갱신 구간보다 짧을 때만 refresh 토큰도 새로 발급하여 교체

use crate::{
    db,
    error::{AppError, ErrorCode},
    middleware::auth::{create_token, hash_token, should_renew, verify_token, TokenKind},
    models::*,
    routes::AppState,
    services::{kakao::KakaoProfile, member},
};

/// 로그인 성공 결과
#[derive(Debug)]
pub struct LoginSession {
    pub info: MemberInfoResponse,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug)]
pub enum RefreshOutcome {
    /// 토큰이 없거나, 유효하지 않거나, 저장소에 없음
    Rejected,
    Renewed {
        info: MemberInfoResponse,
        access_token: String,
        /// 갱신 구간에 들어온 경우에만 새 refresh 토큰이 발급됩니다.
        refresh_token: Option<String>,
    },
}

pub async fn login(state: &AppState, req: &LoginRequest) -> Result<LoginSession, AppError> {
    let member = db::members::find_by_email(&state.pool, req.email.trim())
        .await?
        .filter(|m| !m.is_deleted)
        .ok_or(ErrorCode::LoginFailed)?;

    if !member::verify_password(&req.password, &member.password_hash)? {
        return Err(ErrorCode::LoginFailed.into());
    }

    let session = issue_session(state, &member).await?;
    tracing::info!(member_id = %member.id, "member logged in");
    Ok(session)
}

/// access/refresh 토큰을 발급하고 refresh 토큰을 저장합니다.
pub async fn issue_session(state: &AppState, member: &Member) -> Result<LoginSession, AppError> {
    let roles = db::members::find_roles(&state.pool, &member.id).await?;

    let access_token = token(&member.email, &roles, TokenKind::Access, state)?;
    let refresh_token = token(&member.email, &roles, TokenKind::Refresh, state)?;
    db::refresh::replace_refresh_token(&state.pool, &member.email, &hash_token(&refresh_token))
        .await?;

    Ok(LoginSession {
        info: member_info(member, roles),
        access_token,
        refresh_token,
    })
}

pub async fn refresh(
    state: &AppState,
    refresh_token: Option<&str>,
) -> Result<RefreshOutcome, AppError> {
    let Some(refresh_token) = refresh_token.filter(|t| !t.is_empty()) else {
        return Ok(RefreshOutcome::Rejected);
    };

    let claims = match verify_token(refresh_token, &state.config.jwt_secret, TokenKind::Refresh) {
        Ok(claims) => claims,
        Err(_) => return Ok(RefreshOutcome::Rejected),
    };

    let stored_email =
        db::refresh::find_email_by_token_hash(&state.pool, &hash_token(refresh_token)).await?;
    if stored_email.as_deref() != Some(claims.sub.as_str()) {
        return Ok(RefreshOutcome::Rejected);
    }

    let member = match db::members::find_by_email(&state.pool, &claims.sub).await? {
        Some(member) if !member.is_deleted => member,
        _ => return Ok(RefreshOutcome::Rejected),
    };
    let roles = db::members::find_roles(&state.pool, &member.id).await?;

    let access_token = token(&member.email, &roles, TokenKind::Access, state)?;

    let renewed = if should_renew(&claims, state.config.refresh_renew_seconds) {
        let new_token = token(&member.email, &roles, TokenKind::Refresh, state)?;
        db::refresh::replace_refresh_token(&state.pool, &member.email, &hash_token(&new_token))
            .await?;
        tracing::debug!(member_id = %member.id, "refresh token rotated");
        Some(new_token)
    } else {
        None
    };

    Ok(RefreshOutcome::Renewed {
        info: member_info(&member, roles),
        access_token,
        refresh_token: renewed,
    })
}

/// 쿠키의 refresh 토큰 주인의 저장된 토큰을 모두 지웁니다.
pub async fn logout(state: &AppState, refresh_token: Option<&str>) -> Result<(), AppError> {
    let Some(refresh_token) = refresh_token.filter(|t| !t.is_empty()) else {
        return Ok(());
    };

    if let Some(email) =
        db::refresh::find_email_by_token_hash(&state.pool, &hash_token(refresh_token)).await?
    {
        db::refresh::delete_by_email(&state.pool, &email).await?;
        tracing::info!("member logged out");
    }

    Ok(())
}

/// 카카오 계정으로 로그인합니다. 처음 보는 이메일이면 회원을 만듭니다.
///
/// 같은 이메일이 다른 방법(자체 가입)으로 가입되어 있으면 거부합니다.
pub async fn login_with_kakao(
    state: &AppState,
    profile: &KakaoProfile,
) -> Result<LoginSession, AppError> {
    let member = match db::members::find_by_email(&state.pool, &profile.email).await? {
        Some(existing) => {
            if existing.platform() != Platform::Kakao {
                return Err(ErrorCode::SignupPlatformDuplicated.into());
            }
            if existing.is_deleted {
                return Err(ErrorCode::LoginFailed.into());
            }
            existing
        }
        None => {
            let base = profile
                .nickname
                .clone()
                .unwrap_or_else(|| email_local_part(&profile.email).to_string());
            // 소셜 회원은 비밀번호 로그인을 쓰지 않으므로 임의 값의 해시를 저장합니다.
            let password_hash = member::hash_password(&uuid::Uuid::now_v7().to_string())?;

            let mut tx = state.pool.begin().await?;
            let username = member::unique_username(&mut tx, &base).await?;
            let created = db::members::create_member(
                &mut tx,
                &profile.email,
                &username,
                &password_hash,
                Platform::Kakao,
            )
            .await?;
            tx.commit().await?;

            tracing::info!(member_id = %created.id, "kakao member signed up");
            created
        }
    };

    issue_session(state, &member).await
}

pub fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

fn member_info(member: &Member, roles: Vec<String>) -> MemberInfoResponse {
    MemberInfoResponse {
        status: 200,
        email: member.email.clone(),
        username: member.username.clone(),
        roles,
    }
}

fn token(
    email: &str,
    roles: &[String],
    kind: TokenKind,
    state: &AppState,
) -> Result<String, AppError> {
    create_token(email, roles, kind, &state.config)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}
