//! # diglog 웹 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 데이터베이스 연결 풀 생성
//! 4. 데이터베이스 마이그레이션 실행
//! 5. 이미지 저장소, 메일 발송기, 카카오 클라이언트 준비
//! 6. API 라우터 설정
//! 7. HTTP 서버 시작

// ── 모듈 선언 ──
mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use anyhow::Result; // main에서만 anyhow를 사용합니다. 나머지는 AppError
use config::Config;
use routes::AppState;
use services::{kakao::KakaoClient, mail::LogMailer, storage::LocalStore};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // RUST_LOG가 없으면 diglog, tower_http, axum 모듈을 debug 레벨로 설정
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "diglog=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env()?;
    tracing::info!("Starting diglog server on {}:{}", config.host, config.port);

    // ── 4단계: SQLite 연결 풀 생성 ──
    // 외래키(ON DELETE SET NULL)가 동작하도록 연결마다 foreign_keys를 켭니다.
    let connect_options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await?;

    // ── 5단계: 데이터베이스 마이그레이션 실행 ──
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    // ── 6단계: 외부 연동 준비 ──
    // LocalStore::new는 업로드 디렉토리가 없으면 생성합니다.
    let store = LocalStore::new(&config.uploads_path, &config.public_base_url).await?;
    tracing::info!("Serving uploaded images from {}", config.uploads_path);

    let mailer = LogMailer::new(config.mail_sender.clone());
    let kakao = KakaoClient::new(config.kakao.clone());

    // ── 7단계: 애플리케이션 상태(State) 생성 ──
    // SqlitePool과 Arc는 clone해도 같은 자원을 가리킵니다.
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        store: Arc::new(store),
        mailer: Arc::new(mailer),
        kakao,
    };

    // ── 8단계: 라우터 조립 ──
    // /api/**, /actuator/health, /images/** 와 CORS, 요청 로깅 레이어
    let app = routes::router(state);

    // ── 9단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
