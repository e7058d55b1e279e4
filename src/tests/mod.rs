//! 라우터 단위 통합 테스트
//!
//! 각 테스트는 마이그레이션을 적용한 in-memory SQLite와 임시 업로드 디렉토리로
//! 전체 라우터를 만들고, `tower::ServiceExt::oneshot`으로 요청을 보냅니다.
//!
//! - `member_api_tests`: 이메일 인증, 가입, 로그인, 토큰 갱신, 로그아웃, 프로필
//! - `post_api_tests`: 게시글 작성/수정/조회/검색/삭제
//! - `comment_api_tests`: 댓글 깊이 제한과 목록
//! - `folder_api_tests`: 폴더 일괄 저장/삭제
//! - `image_health_api_tests`: 이미지 업로드, 헬스체크, actuator 인증

mod member_api_tests;
mod post_api_tests;

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::{
    config::Config,
    middleware::auth::REFRESH_COOKIE,
    routes::{self, AppState},
    services::{
        kakao::KakaoClient,
        mail::{MailError, Mailer},
        storage::LocalStore,
    },
};

pub const PASSWORD: &str = "password123";

const BOUNDARY: &str = "diglog-test-boundary";

pub fn multipart_request(uri: &str, token: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"cat photo.png\"\r\nContent-Type: {ct}\r\n\r\n",
            b = BOUNDARY,
            ct = content_type
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// 보낸 메일을 기억해 두는 테스트용 발송기
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    /// 마지막으로 받은 메일 본문의 `[123456]`에서 코드를 꺼냅니다.
    pub fn last_code(&self, to: &str) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        let (_, body) = sent.iter().rev().find(|(addr, _)| addr == to)?;
        let start = body.find('[')? + 1;
        let end = body[start..].find(']')? + start;
        Some(body[start..end].to_string())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, _subject: &str, body: &str) -> Result<(), MailError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), body.to_string()));
        Ok(())
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn error_code(&self) -> &str {
        self.body["error"]["code"].as_str().unwrap_or_default()
    }

    /// `Authorization: Bearer <token>` 헤더의 토큰
    pub fn access_token(&self) -> Option<String> {
        self.headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")
            .map(str::to_string)
    }

    /// `Set-Cookie: refreshToken=...`의 값
    pub fn refresh_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|v| {
                v.split(';')
                    .next()?
                    .strip_prefix(&format!("{}=", REFRESH_COOKIE))
                    .map(str::to_string)
            })
    }
}

/// 로그인한 회원
pub struct Session {
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub mailer: Arc<RecordingMailer>,
    _uploads: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(customize: impl FnOnce(&mut Config)) -> Self {
        let uploads = TempDir::new().unwrap();
        let uploads_path = uploads.path().to_str().unwrap().to_string();

        let mut config = Config::for_tests(&uploads_path);
        customize(&mut config);

        // in-memory DB는 연결마다 따로 생기므로 연결 하나를 계속 유지합니다.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();

        let store = LocalStore::new(&uploads_path, &config.public_base_url)
            .await
            .unwrap();
        let mailer = Arc::new(RecordingMailer::default());

        let state = AppState {
            pool,
            kakao: KakaoClient::new(config.kakao.clone()),
            config: Arc::new(config),
            store: Arc::new(store),
            mailer: mailer.clone(),
        };

        Self {
            router: routes::router(state.clone()),
            state,
            mailer,
            _uploads: uploads,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, None).await
    }

    /// 인증 코드 발송 → 확인 → 가입 → 로그인까지 진행합니다.
    pub async fn signup_and_login(&self, email: &str) -> Session {
        let res = self
            .request(Method::POST, "/api/verify", None, Some(json!({ "email": email })))
            .await;
        assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);

        let code = self.mailer.last_code(email).expect("verification mail");
        let res = self
            .request(
                Method::POST,
                "/api/verify/code",
                None,
                Some(json!({ "email": email, "code": code })),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);

        let res = self
            .request(
                Method::POST,
                "/api/verify/signup",
                None,
                Some(json!({ "email": email, "password": PASSWORD, "code": code })),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{:?}", res.body);

        self.login(email, PASSWORD).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Session {
        let res = self
            .request(
                Method::POST,
                "/api/member/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);

        Session {
            email: email.to_string(),
            access_token: res.access_token().expect("access token header"),
            refresh_token: res.refresh_cookie().expect("refresh cookie"),
        }
    }

    /// 게시글을 만들고 ID를 돌려줍니다.
    pub async fn create_post(&self, session: &Session, body: Value) -> String {
        let res = self
            .request(Method::POST, "/api/post", Some(&session.access_token), Some(body))
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{:?}", res.body);
        res.body["id"].as_str().unwrap().to_string()
    }

    /// `/api/image`로 이미지를 올리고 URL을 돌려줍니다.
    pub async fn upload_image(&self, session: &Session, file: &[u8]) -> String {
        let res = self
            .send(multipart_request("/api/image", &session.access_token, "image/png", file))
            .await;
        assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
        res.body["url"].as_str().unwrap().to_string()
    }

    /// 이미지 URL이 가리키는 업로드 디렉토리 안의 파일 경로
    pub fn stored_path(&self, url: &str) -> PathBuf {
        let key = url
            .strip_prefix(&format!("{}/", self.state.config.public_base_url))
            .unwrap();
        PathBuf::from(&self.state.config.uploads_path).join(key)
    }
}
