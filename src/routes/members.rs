//! # 회원(Member) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST /api/member/login` → 로그인 (access 토큰은 `Authorization` 헤더, refresh 토큰은 쿠키)
//! - `POST /api/member/logout` → refresh 쿠키 만료 + 저장된 토큰 삭제
//! - `GET  /api/member/refresh` → access 토큰 재발급 (필요하면 refresh 토큰도 교체)
//! - `POST /api/member/username` → 사용자 이름 변경
//! - `GET  /api/member/profile` → 내 프로필
//! - `GET  /api/member/profile/{username}` → 다른 회원 프로필
//! - `GET  /api/member/profile/search/{username}` → 사용자 이름 검색
//! - `POST /api/member/image` → 프로필 이미지 변경

use axum::{
    extract::{Multipart, Path, Query, State},
    http::header::AUTHORIZATION,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use serde_json::json;

use crate::{
    error::AppError,
    middleware::auth::{expired_refresh_cookie, refresh_cookie, AuthUser, REFRESH_COOKIE},
    models::*,
    routes::{images::read_upload, AppState},
    services::{
        auth::{self, RefreshOutcome},
        member,
    },
};

fn bearer(token: &str) -> [(axum::http::HeaderName, String); 1] {
    [(AUTHORIZATION, format!("Bearer {}", token))]
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = auth::login(&state, &req).await?;

    let jar = jar.add(refresh_cookie(session.refresh_token, &state.config));
    Ok((jar, bearer(&session.access_token), Json(session.info)))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let token = jar.get(REFRESH_COOKIE).map(|c| c.value().to_string());
    auth::logout(&state, token.as_deref()).await?;

    Ok(jar.add(expired_refresh_cookie(&state.config)))
}

/// 토큰이 유효하지 않아도 HTTP 200에 `{"status":401}`로 응답합니다.
pub async fn refresh(State(state): State<AppState>, jar: CookieJar) -> Result<Response, AppError> {
    let token = jar.get(REFRESH_COOKIE).map(|c| c.value().to_string());

    match auth::refresh(&state, token.as_deref()).await? {
        RefreshOutcome::Rejected => Ok(Json(json!({ "status": 401 })).into_response()),
        RefreshOutcome::Renewed {
            info,
            access_token,
            refresh_token,
        } => {
            let jar = match refresh_token {
                Some(token) => jar.add(refresh_cookie(token, &state.config)),
                None => jar,
            };
            Ok((jar, bearer(&access_token), Json(info)).into_response())
        }
    }
}

pub async fn update_username(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<MemberUsernameRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    member::rename(&state.pool, &user.email, &req.username).await?;
    Ok(Json(json!({ "username": req.username.trim() })))
}

pub async fn profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<MemberProfileResponse>, AppError> {
    Ok(Json(member::profile(&state.pool, &user.email).await?))
}

pub async fn public_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<MemberProfileInfoResponse>, AppError> {
    Ok(Json(member::public_profile(&state.pool, &username).await?))
}

pub async fn search(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<MemberProfileInfoResponse>>, AppError> {
    let page = member::search(&state.pool, &username, params.into()).await?;
    Ok(Json(page))
}

pub async fn update_profile_image(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<Json<ImageUrlResponse>, AppError> {
    let upload = read_upload(multipart).await?;
    let url = member::update_profile_image(&state, &user.email, upload).await?;
    Ok(Json(ImageUrlResponse { url }))
}
