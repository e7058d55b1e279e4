//! # 카카오 OAuth2 로그인
//!
//! 1. `GET /api/oauth2/authorization/kakao` → 카카오 동의 화면으로 302
//! 2. 카카오가 `GET /api/login/oauth2/code/kakao?code=...`로 되돌려 보냄
//! 3. 코드 교환 → 프로필 조회 → 회원 조회/생성 → refresh 쿠키 설정
//! 4. 프론트엔드로 302. 실패하면 `{client}/login?error=<메시지>`로 보냅니다.
//!
//! 프론트엔드는 이후 `/api/member/refresh`를 호출해 access 토큰을 받습니다.

use axum::{
    extract::{Query, State},
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::{
    error::AppError,
    middleware::auth::refresh_cookie,
    routes::AppState,
    services::auth,
};

const LOGIN_FAILED_MESSAGE: &str = "소셜 로그인에 실패했습니다.";

#[derive(Debug, Deserialize)]
pub struct KakaoCallback {
    pub code: Option<String>,
    pub error: Option<String>,
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}

pub async fn authorize(State(state): State<AppState>) -> Response {
    match state.kakao.authorize_url() {
        Ok(url) => found(&url),
        Err(e) => {
            tracing::error!("Failed to build kakao authorize url: {}", e);
            failure_redirect(&state, LOGIN_FAILED_MESSAGE)
        }
    }
}

pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<KakaoCallback>,
) -> Response {
    let code = match (params.code, params.error) {
        (Some(code), None) if !code.is_empty() => code,
        (_, error) => {
            tracing::warn!(error = ?error, "kakao login canceled or denied");
            return failure_redirect(&state, LOGIN_FAILED_MESSAGE);
        }
    };

    let profile = match state.kakao.fetch_profile(&code).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!("kakao profile request failed: {}", e);
            return failure_redirect(&state, LOGIN_FAILED_MESSAGE);
        }
    };

    match auth::login_with_kakao(&state, &profile).await {
        Ok(session) => {
            let jar = jar.add(refresh_cookie(session.refresh_token, &state.config));
            (jar, found(state.config.primary_client_url())).into_response()
        }
        Err(e) => {
            let message = match &e {
                AppError::Code(code) => code.to_string(),
                other => {
                    tracing::error!("kakao login failed: {}", other);
                    LOGIN_FAILED_MESSAGE.to_string()
                }
            };
            failure_redirect(&state, &message)
        }
    }
}

fn failure_redirect(state: &AppState, message: &str) -> Response {
    let target = format!("{}/login", state.config.primary_client_url());
    match reqwest::Url::parse_with_params(&target, &[("error", message)]) {
        Ok(url) => found(url.as_str()),
        Err(_) => found(&target),
    }
}
