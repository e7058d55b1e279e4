//! # 인증 미들웨어
//!
//! - JWT(HS512) access/refresh 토큰 발급과 검증
//! - `AuthUser`: `Authorization: Bearer <access>` 헤더를 검증하는 추출기
//! - `AdminUser`: `/actuator` 경로용 HTTP Basic 인증 추출기
//! - refresh 토큰을 담는 `refreshToken` HttpOnly 쿠키 생성

use axum::{
    extract::FromRequestParts,
    http::{
        header::{AUTHORIZATION, WWW_AUTHENTICATE},
        request::Parts,
        StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::config::Config;
use crate::routes::AppState;

pub const REFRESH_COOKIE: &str = "refreshToken";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // member email
    /// 쉼표로 이어 붙인 권한 목록 (예: "ROLE_USER")
    pub auth: String,
    pub typ: String,
    /// 같은 초에 발급된 토큰도 서로 다르도록 붙이는 고유 ID
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn roles(&self) -> Vec<String> {
        self.auth
            .split(',')
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// 로그인한 회원. 토큰에는 이메일만 들어 있으므로 회원 조회는 서비스에서 합니다.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
    pub roles: Vec<String>,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        let claims = verify_token(token, &state.config.jwt_secret, TokenKind::Access)?;

        Ok(AuthUser {
            roles: claims.roles(),
            email: claims.sub,
        })
    }
}

/// 운영 엔드포인트(`/actuator/**`) 접근용 Basic 인증
#[derive(Debug, Clone)]
pub struct AdminUser;

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let encoded = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Basic "))
            .ok_or(AuthError::InvalidCredentials)?;

        let decoded = BASE64
            .decode(encoded.trim())
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .ok_or(AuthError::InvalidCredentials)?;

        let (username, password) = decoded
            .split_once(':')
            .ok_or(AuthError::InvalidCredentials)?;

        if username == state.config.actuator_username && password == state.config.actuator_password
        {
            Ok(AdminUser)
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    InvalidCredentials,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "missing_token",
                "Authorization token is required",
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid authorization token",
            ),
            AuthError::ExpiredToken => (
                StatusCode::UNAUTHORIZED,
                "expired_token",
                "Authorization token has expired",
            ),
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Valid basic credentials are required",
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        if self == AuthError::InvalidCredentials {
            return (status, [(WWW_AUTHENTICATE, "Basic realm=\"actuator\"")], body).into_response();
        }

        (status, body).into_response()
    }
}

pub fn create_token(
    email: &str,
    roles: &[String],
    kind: TokenKind,
    config: &Config,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let lifetime = match kind {
        TokenKind::Access => config.access_token_seconds,
        TokenKind::Refresh => config.refresh_token_seconds,
    };
    let claims = Claims {
        sub: email.to_string(),
        auth: roles.join(","),
        typ: kind.as_str().to_string(),
        jti: uuid::Uuid::now_v7().to_string(),
        iat: now,
        exp: now + lifetime,
    };

    encode(
        &Header::new(Algorithm::HS512),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
}

/// 서명, 만료, 토큰 종류(`typ`)를 모두 확인합니다.
pub fn verify_token(token: &str, secret: &str, kind: TokenKind) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS512),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })?;

    if token_data.claims.typ != kind.as_str() {
        return Err(AuthError::InvalidToken);
    }

    Ok(token_data.claims)
}

/// 남은 수명이 갱신 구간보다 짧으면 새 refresh 토큰을 발급해야 합니다.
pub fn should_renew(claims: &Claims, renew_seconds: i64) -> bool {
    claims.exp - Utc::now().timestamp() < renew_seconds
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn refresh_cookie(token: String, config: &Config) -> Cookie<'static> {
    build_cookie(token, config.refresh_token_seconds, config)
}

/// 로그아웃용: 빈 값 + Max-Age=0
pub fn expired_refresh_cookie(config: &Config) -> Cookie<'static> {
    build_cookie(String::new(), 0, config)
}

fn build_cookie(value: String, max_age: i64, config: &Config) -> Cookie<'static> {
    let mut builder = Cookie::build((REFRESH_COOKIE, value))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .secure(config.is_prod())
        .max_age(time::Duration::seconds(max_age));

    if let Some(domain) = &config.cookie_domain {
        builder = builder.domain(domain.clone());
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::for_tests("unused")
    }

    #[test]
    fn access_token_round_trips_email_and_roles() {
        let config = config();
        let token = create_token(
            "user@diglog.com",
            &["ROLE_USER".to_string()],
            TokenKind::Access,
            &config,
        )
        .unwrap();

        let claims = verify_token(&token, &config.jwt_secret, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, "user@diglog.com");
        assert_eq!(claims.roles(), vec!["ROLE_USER".to_string()]);
    }

    #[test]
    fn refresh_token_is_rejected_as_access_token() {
        let config = config();
        let token = create_token("a@b.com", &[], TokenKind::Refresh, &config).unwrap();

        assert_eq!(
            verify_token(&token, &config.jwt_secret, TokenKind::Access).unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let config = config();
        let token = create_token("a@b.com", &[], TokenKind::Access, &config).unwrap();

        assert_eq!(
            verify_token(&token, "another-secret", TokenKind::Access).unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn renew_only_inside_window() {
        let now = Utc::now().timestamp();
        let mut claims = Claims {
            sub: "a@b.com".to_string(),
            auth: String::new(),
            typ: "refresh".to_string(),
            jti: "test".to_string(),
            iat: now,
            exp: now + 14 * 24 * 3600,
        };
        assert!(!should_renew(&claims, 3 * 24 * 3600));

        claims.exp = now + 24 * 3600;
        assert!(should_renew(&claims, 3 * 24 * 3600));
    }

    #[test]
    fn logout_cookie_expires_immediately() {
        let cookie = expired_refresh_cookie(&config());
        assert_eq!(cookie.name(), REFRESH_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
        assert_eq!(cookie.http_only(), Some(true));
    }
}
