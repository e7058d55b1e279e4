//! # 카카오 OAuth2 클라이언트
//!
//! 1. 사용자를 카카오 인가 페이지로 보냅니다. (`authorize_url`)
//! 2. 콜백으로 받은 인가 코드를 access 토큰으로 교환합니다.
//! 3. access 토큰으로 사용자 정보(이메일, 닉네임)를 조회합니다.

use serde::Deserialize;
use thiserror::Error;

use crate::config::KakaoConfig;

#[derive(Debug, Error)]
pub enum KakaoError {
    #[error("kakao request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("kakao account has no email")]
    MissingEmail,
}

/// 로그인에 필요한 카카오 계정 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KakaoProfile {
    pub email: String,
    pub nickname: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    #[serde(default)]
    kakao_account: Option<KakaoAccount>,
}

#[derive(Debug, Deserialize)]
struct KakaoAccount {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    profile: Option<KakaoAccountProfile>,
}

#[derive(Debug, Deserialize)]
struct KakaoAccountProfile {
    #[serde(default)]
    nickname: Option<String>,
}

#[derive(Clone)]
pub struct KakaoClient {
    http: reqwest::Client,
    config: KakaoConfig,
}

impl KakaoClient {
    pub fn new(config: KakaoConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn authorize_url(&self) -> Result<String, KakaoError> {
        // 요청을 보내지 않고 쿼리스트링 인코딩에만 사용합니다.
        let request = self
            .http
            .get(&self.config.authorize_url)
            .query(&[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", "account_email profile_nickname"),
            ])
            .build()?;
        Ok(request.url().to_string())
    }

    /// 인가 코드로 카카오 계정 정보를 가져옵니다.
    pub async fn fetch_profile(&self, code: &str) -> Result<KakaoProfile, KakaoError> {
        let token = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("code", code),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<TokenResponse>()
            .await?;

        let user = self
            .http
            .get(&self.config.user_info_url)
            .bearer_auth(&token.access_token)
            .send()
            .await?
            .error_for_status()?
            .json::<UserResponse>()
            .await?;

        profile_from(user)
    }
}

fn profile_from(user: UserResponse) -> Result<KakaoProfile, KakaoError> {
    let account = user.kakao_account.ok_or(KakaoError::MissingEmail)?;
    let email = account
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or(KakaoError::MissingEmail)?;
    let nickname = account
        .profile
        .and_then(|p| p.nickname)
        .filter(|n| !n.trim().is_empty());

    Ok(KakaoProfile { email, nickname })
}
