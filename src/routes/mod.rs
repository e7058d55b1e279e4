//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//! 핸들러는 요청 값을 추출해 서비스 계층에 넘기고, 결과를 응답으로 바꾸는 일만 합니다.
//!
//! 각 하위 모듈:
//! - `members`: 로그인, 로그아웃, 토큰 갱신, 회원 프로필
//! - `oauth`: 카카오 OAuth2 로그인
//! - `verification`: 이메일 인증 코드와 회원가입
//! - `posts`, `comments`, `folders`, `tags`, `images`: 블로그 기능
//! - `health`: 헬스체크와 운영용 `/actuator/health`

pub mod comments;
pub mod folders;
pub mod health;
pub mod images;
pub mod members;
pub mod oauth;
pub mod posts;
pub mod tags;
pub mod verification;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, patch, post, put},
    Router,
};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    config::Config,
    services::{kakao::KakaoClient, mail::Mailer, storage::ObjectStore},
};

/// 업로드 요청 본문 최대 크기 (10MB)
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// 모든 핸들러가 공유하는 애플리케이션 상태
///
/// `Clone`이 필요하지만, 내부 값은 모두 `Arc`이거나 Arc를 품고 있어
/// 복제해도 실제 자원은 공유됩니다.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    pub store: Arc<dyn ObjectStore>,
    pub mailer: Arc<dyn Mailer>,
    pub kakao: KakaoClient,
}

/// 전체 라우터를 조립합니다.
pub fn router(state: AppState) -> Router {
    let member_routes = Router::new()
        .route("/login", post(members::login))
        .route("/logout", post(members::logout))
        .route("/refresh", get(members::refresh))
        .route("/username", post(members::update_username))
        .route("/profile", get(members::profile))
        .route("/profile/{username}", get(members::public_profile))
        .route("/profile/search/{username}", get(members::search))
        .route("/image", post(members::update_profile_image));

    let api_routes = Router::new()
        .nest("/member", member_routes)
        .route("/oauth2/authorization/kakao", get(oauth::authorize))
        .route("/login/oauth2/code/kakao", get(oauth::callback))
        .route("/verify", post(verification::send_code))
        .route("/verify/code", post(verification::verify_code))
        .route("/verify/signup", post(verification::signup))
        .route(
            "/post",
            get(posts::list_posts)
                .post(posts::create_post)
                .patch(posts::update_post),
        )
        .route("/post/folder", patch(posts::move_posts))
        .route("/post/search", get(posts::search_posts))
        .route("/post/member", get(posts::member_posts))
        .route("/post/member/tag", get(posts::member_tag_posts))
        .route("/post/delete/{id}", patch(posts::delete_post))
        .route("/post/{id}", get(posts::get_post))
        .route(
            "/comment",
            get(comments::list_comments)
                .post(comments::create_comment)
                .patch(comments::update_comment),
        )
        .route("/comment/delete/{id}", patch(comments::delete_comment))
        .route(
            "/folders",
            put(folders::save_folders).delete(folders::delete_folders),
        )
        .route("/folders/{username}", get(folders::list_folders))
        .route("/tag/{username}", get(tags::member_tags))
        .route("/image", post(images::upload_image))
        .route("/health", get(health::health_check));

    let cors = cors_layer(&state.config);
    let uploads = ServeDir::new(&state.config.uploads_path);

    Router::new()
        .nest("/api", api_routes)
        .route("/actuator/health", get(health::actuator_health))
        .nest_service("/images", uploads)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 허용 origin은 `CLIENT_URLS` 목록이고, refresh 쿠키를 위해 credentials를 허용합니다.
fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .client_urls
        .iter()
        .filter_map(|url| HeaderValue::from_str(url).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .expose_headers([AUTHORIZATION])
}
