//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `JWT_SECRET`: JWT 토큰 서명(HS512)에 사용할 비밀키 (필수)
//! - `HOST`, `PORT`: 서버 바인딩 주소
//! - `UPLOADS_PATH`: 업로드 이미지 저장 디렉토리
//! - `PUBLIC_BASE_URL`: 이미지 URL 앞에 붙는 공개 주소
//! - `CLIENT_URLS`: CORS 허용 및 OAuth2 완료 후 리다이렉트할 프론트엔드 주소 (쉼표 구분)
//! - `APP_ENV`: `prod`이면 refresh 쿠키에 Secure 속성을 붙입니다
//! - `COOKIE_DOMAIN`: refresh 쿠키 Domain 속성 (선택)
//! - `JWT_ACCESS_SECONDS`, `JWT_REFRESH_SECONDS`, `JWT_RENEW_SECONDS`: 토큰 수명/갱신 구간
//! - `KAKAO_CLIENT_ID`, `KAKAO_CLIENT_SECRET`, `KAKAO_REDIRECT_URI`: 카카오 OAuth2 설정
//! - `MAIL_SENDER`: 인증 메일 발신 주소
//! - `ACTUATOR_USERNAME`, `ACTUATOR_PASSWORD`: `/actuator` Basic 인증 계정

use std::env;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// `Arc<Config>`로 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 파일 경로 (예: "sqlite:data/diglog.db")
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    /// 업로드 이미지가 저장되는 디렉토리 경로
    pub uploads_path: String,
    /// 예: "http://localhost:8080/images"
    pub public_base_url: String,
    pub client_urls: Vec<String>,
    pub app_env: String,
    pub cookie_domain: Option<String>,
    /// access 토큰 수명 (초, 기본 30분)
    pub access_token_seconds: i64,
    /// refresh 토큰 수명 (초, 기본 14일)
    pub refresh_token_seconds: i64,
    /// refresh 토큰 남은 수명이 이 값보다 짧으면 새로 발급합니다 (초, 기본 3일)
    pub refresh_renew_seconds: i64,
    pub kakao: KakaoConfig,
    pub mail_sender: String,
    pub actuator_username: String,
    pub actuator_password: String,
}

#[derive(Debug, Clone)]
pub struct KakaoConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub authorize_url: String,
    pub token_url: String,
    pub user_info_url: String,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`과 `JWT_SECRET`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            jwt_secret: env::var("JWT_SECRET")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            uploads_path: env::var("UPLOADS_PATH").unwrap_or_else(|_| "data/uploads".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}/images", port)),
            // "http://a.com, http://b.com" → ["http://a.com", "http://b.com"]
            client_urls: env::var("CLIENT_URLS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .split(',')
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "local".to_string()),
            cookie_domain: env::var("COOKIE_DOMAIN").ok().filter(|s| !s.is_empty()),
            access_token_seconds: seconds_var("JWT_ACCESS_SECONDS", 30 * 60),
            refresh_token_seconds: seconds_var("JWT_REFRESH_SECONDS", 14 * 24 * 60 * 60),
            refresh_renew_seconds: seconds_var("JWT_RENEW_SECONDS", 3 * 24 * 60 * 60),
            kakao: KakaoConfig {
                client_id: env::var("KAKAO_CLIENT_ID").unwrap_or_default(),
                client_secret: env::var("KAKAO_CLIENT_SECRET").unwrap_or_default(),
                redirect_uri: env::var("KAKAO_REDIRECT_URI").unwrap_or_else(|_| {
                    format!("http://localhost:{}/api/login/oauth2/code/kakao", port)
                }),
                authorize_url: "https://kauth.kakao.com/oauth/authorize".to_string(),
                token_url: "https://kauth.kakao.com/oauth/token".to_string(),
                user_info_url: "https://kapi.kakao.com/v2/user/me".to_string(),
            },
            mail_sender: env::var("MAIL_SENDER").unwrap_or_else(|_| "no-reply@diglog.store".to_string()),
            actuator_username: env::var("ACTUATOR_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            actuator_password: env::var("ACTUATOR_PASSWORD").unwrap_or_else(|_| "admin".to_string()),
        })
    }

    /// `APP_ENV=prod`일 때만 쿠키에 Secure 속성을 붙입니다.
    pub fn is_prod(&self) -> bool {
        self.app_env == "prod"
    }

    /// OAuth2 완료 후 돌아갈 기본 프론트엔드 주소
    pub fn primary_client_url(&self) -> &str {
        self.client_urls
            .first()
            .map(String::as_str)
            .unwrap_or("http://localhost:3000")
    }

    /// 테스트용 설정. 외부 연동 값은 모두 더미입니다.
    #[cfg(test)]
    pub fn for_tests(uploads_path: &str) -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test-secret-test-secret-test-secret-test-secret".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8080,
            uploads_path: uploads_path.to_string(),
            public_base_url: "http://localhost:8080/images".to_string(),
            client_urls: vec!["http://localhost:3000".to_string()],
            app_env: "test".to_string(),
            cookie_domain: None,
            access_token_seconds: 30 * 60,
            refresh_token_seconds: 14 * 24 * 60 * 60,
            refresh_renew_seconds: 3 * 24 * 60 * 60,
            kakao: KakaoConfig {
                client_id: "kakao-client".to_string(),
                client_secret: "kakao-secret".to_string(),
                redirect_uri: "http://localhost:8080/api/login/oauth2/code/kakao".to_string(),
                authorize_url: "https://kauth.kakao.com/oauth/authorize".to_string(),
                token_url: "http://127.0.0.1:9/oauth/token".to_string(),
                user_info_url: "http://127.0.0.1:9/v2/user/me".to_string(),
            },
            mail_sender: "no-reply@diglog.store".to_string(),
            actuator_username: "admin".to_string(),
            actuator_password: "secret".to_string(),
        }
    }
}

// 숫자 파싱 실패 시 기본값을 사용합니다.
fn seconds_var(key: &str, default: i64) -> i64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|v: &i64| *v > 0)
        .unwrap_or(default)
}
