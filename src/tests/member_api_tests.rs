use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;

use super::{TestApp, PASSWORD};
use crate::{
    db,
    error::{AppError, ErrorCode},
    middleware::auth::{create_token, hash_token, TokenKind},
    models::Platform,
    services::{auth, kakao::KakaoProfile},
};

fn refresh_request(token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri("/api/member/refresh")
        .header(header::COOKIE, format!("refreshToken={}", token))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn signup_then_login_returns_member_info_and_tokens() {
    let app = TestApp::new().await;
    app.signup_and_login("writer@diglog.com").await;

    let res = app
        .request(
            Method::POST,
            "/api/member/login",
            None,
            Some(json!({ "email": "writer@diglog.com", "password": PASSWORD })),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], 200);
    assert_eq!(res.body["email"], "writer@diglog.com");
    assert_eq!(res.body["username"], "writer");
    assert_eq!(res.body["roles"], json!(["ROLE_USER"]));
    assert!(res.access_token().is_some());

    let cookie = res
        .headers
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));
}

#[tokio::test]
async fn wrong_password_is_login_failed() {
    let app = TestApp::new().await;
    app.signup_and_login("writer@diglog.com").await;

    let res = app
        .request(
            Method::POST,
            "/api/member/login",
            None,
            Some(json!({ "email": "writer@diglog.com", "password": "wrongpass1" })),
        )
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error_code(), "LOGIN_FAILED");
}

#[tokio::test]
async fn second_signup_gets_unique_username() {
    let app = TestApp::new().await;
    app.signup_and_login("writer@diglog.com").await;
    let other = app.signup_and_login("writer@other.com").await;

    let res = app
        .request(Method::GET, "/api/member/profile", Some(&other.access_token), None)
        .await;

    assert_eq!(res.status, StatusCode::OK);
    let username = res.body["username"].as_str().unwrap();
    assert!(username.starts_with("writer_"));
    assert_eq!(username.len(), "writer_".len() + 4);
}

#[tokio::test]
async fn verify_rejects_existing_member_and_bad_email() {
    let app = TestApp::new().await;
    app.signup_and_login("writer@diglog.com").await;

    let res = app
        .request(Method::POST, "/api/verify", None, Some(json!({ "email": "writer@diglog.com" })))
        .await;
    assert_eq!(res.error_code(), "SIGNUP_MEMBER_EXISTS");

    let res = app
        .request(Method::POST, "/api/verify", None, Some(json!({ "email": "not-an-email" })))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error_code(), "VALIDATION_EMAIL");
}

#[tokio::test]
async fn wrong_and_expired_codes_are_rejected() {
    let app = TestApp::new().await;
    let email = "late@diglog.com";

    let res = app
        .request(Method::POST, "/api/verify/code", None, Some(json!({ "email": email, "code": "000000" })))
        .await;
    assert_eq!(res.error_code(), "SIGNUP_CODE_NOT_EXISTS");

    app.request(Method::POST, "/api/verify", None, Some(json!({ "email": email })))
        .await;
    let code = app.mailer.last_code(email).unwrap();
    let wrong = if code == "111111" { "222222" } else { "111111" };

    let res = app
        .request(Method::POST, "/api/verify/code", None, Some(json!({ "email": email, "code": wrong })))
        .await;
    assert_eq!(res.error_code(), "SIGNUP_CODE_NOT_MATCHED");

    db::verifications::set_created_at(&app.state.pool, email, "2000-01-01T00:00:00.000Z")
        .await
        .unwrap();
    let res = app
        .request(Method::POST, "/api/verify/code", None, Some(json!({ "email": email, "code": code })))
        .await;
    assert_eq!(res.error_code(), "SIGNUP_CODE_EXPIRED");
}

#[tokio::test]
async fn signup_requires_verified_code_and_valid_password() {
    let app = TestApp::new().await;
    let email = "new@diglog.com";

    app.request(Method::POST, "/api/verify", None, Some(json!({ "email": email })))
        .await;
    let code = app.mailer.last_code(email).unwrap();

    let res = app
        .request(
            Method::POST,
            "/api/verify/signup",
            None,
            Some(json!({ "email": email, "password": PASSWORD, "code": code })),
        )
        .await;
    assert_eq!(res.error_code(), "SIGNUP_CODE_NOT_VERIFIED");

    let res = app
        .request(
            Method::POST,
            "/api/verify/signup",
            None,
            Some(json!({ "email": email, "password": "short1", "code": code })),
        )
        .await;
    assert_eq!(res.error_code(), "VALIDATION_PASSWORD");
}

#[tokio::test]
async fn refresh_without_cookie_answers_status_401_in_body() {
    let app = TestApp::new().await;

    let res = app.get("/api/member/refresh").await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({ "status": 401 }));
}

#[tokio::test]
async fn refresh_outside_renew_window_keeps_cookie() {
    let app = TestApp::new().await;
    let session = app.signup_and_login("writer@diglog.com").await;

    let res = app.send(refresh_request(&session.refresh_token)).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], 200);
    assert!(res.access_token().is_some());
    assert!(res.refresh_cookie().is_none());
}

#[tokio::test]
async fn refresh_inside_renew_window_rotates_token() {
    // 수명(1시간)이 갱신 구간(3일)보다 짧으므로 매번 새 refresh 토큰이 발급됩니다.
    let app = TestApp::with_config(|c| c.refresh_token_seconds = 3600).await;
    let session = app.signup_and_login("writer@diglog.com").await;

    let res = app.send(refresh_request(&session.refresh_token)).await;
    let rotated = res.refresh_cookie().expect("rotated cookie");
    assert_eq!(res.body["status"], 200);

    // 교체된 이전 토큰은 더 이상 쓸 수 없습니다.
    let stale = app.send(refresh_request(&session.refresh_token)).await;
    assert_eq!(stale.body, json!({ "status": 401 }));

    let stored = db::refresh::find_email_by_token_hash(&app.state.pool, &hash_token(&rotated))
        .await
        .unwrap();
    assert_eq!(stored.as_deref(), Some("writer@diglog.com"));
}

#[tokio::test]
async fn access_token_cannot_be_used_as_refresh_token() {
    let app = TestApp::new().await;
    let session = app.signup_and_login("writer@diglog.com").await;

    let res = app.send(refresh_request(&session.access_token)).await;
    assert_eq!(res.body, json!({ "status": 401 }));

    // 서명은 맞지만 저장되지 않은 refresh 토큰
    let forged = create_token(
        &session.email,
        &["ROLE_USER".to_string()],
        TokenKind::Refresh,
        &app.state.config,
    )
    .unwrap();
    let res = app.send(refresh_request(&forged)).await;
    assert_eq!(res.body, json!({ "status": 401 }));
}

#[tokio::test]
async fn logout_expires_cookie_and_revokes_refresh_token() {
    let app = TestApp::new().await;
    let session = app.signup_and_login("writer@diglog.com").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/member/logout")
        .header(header::COOKIE, format!("refreshToken={}", session.refresh_token))
        .body(Body::empty())
        .unwrap();
    let res = app.send(request).await;

    assert_eq!(res.status, StatusCode::OK);
    let cookie = res
        .headers
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("refreshToken=;"));
    assert!(cookie.contains("Max-Age=0"));

    let res = app.send(refresh_request(&session.refresh_token)).await;
    assert_eq!(res.body, json!({ "status": 401 }));
}

#[tokio::test]
async fn protected_route_requires_bearer_token() {
    let app = TestApp::new().await;

    let res = app.get("/api/member/profile").await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app
        .request(Method::GET, "/api/member/profile", Some("garbage"), None)
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.error_code(), "invalid_token");
}

#[tokio::test]
async fn rename_and_search_members() {
    let app = TestApp::new().await;
    let alice = app.signup_and_login("alice@diglog.com").await;
    let bob = app.signup_and_login("bob@diglog.com").await;

    let res = app
        .request(
            Method::POST,
            "/api/member/username",
            Some(&bob.access_token),
            Some(json!({ "username": "alice" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.error_code(), "MEMBER_USERNAME_DUPLICATED");

    let res = app
        .request(
            Method::POST,
            "/api/member/username",
            Some(&alice.access_token),
            Some(json!({ "username": "AliceDigs" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app.get("/api/member/profile/AliceDigs").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["username"], "AliceDigs");

    let res = app.get("/api/member/profile/search/alice?page=0&size=5").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["page"]["totalElements"], 1);
    assert_eq!(res.body["content"][0]["username"], "AliceDigs");

    let res = app.get("/api/member/profile/nobody").await;
    assert_eq!(res.error_code(), "MEMBER_USERNAME_NOT_FOUND");
}

fn kakao_profile(email: &str, nickname: &str) -> KakaoProfile {
    KakaoProfile {
        email: email.to_string(),
        nickname: Some(nickname.to_string()),
    }
}

#[tokio::test]
async fn kakao_login_creates_member_once() {
    let app = TestApp::new().await;
    let profile = kakao_profile("kakao@diglog.com", "카카오곰");

    let first = auth::login_with_kakao(&app.state, &profile).await.unwrap();
    assert_eq!(first.info.username, "카카오곰");
    assert_eq!(first.info.roles, vec!["ROLE_USER".to_string()]);

    let member = db::members::find_by_email(&app.state.pool, "kakao@diglog.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(member.platform(), Platform::Kakao);

    // 두 번째 로그인은 같은 회원으로 들어옵니다.
    let second = auth::login_with_kakao(&app.state, &profile).await.unwrap();
    assert_eq!(second.info.username, "카카오곰");
    let stored = db::refresh::find_email_by_token_hash(&app.state.pool, &hash_token(&second.refresh_token))
        .await
        .unwrap();
    assert_eq!(stored.as_deref(), Some("kakao@diglog.com"));
}

#[tokio::test]
async fn kakao_login_rejects_email_registered_with_password() {
    let app = TestApp::new().await;
    app.signup_and_login("writer@diglog.com").await;

    let err = auth::login_with_kakao(&app.state, &kakao_profile("writer@diglog.com", "writer"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Code(ErrorCode::SignupPlatformDuplicated)));
}

#[tokio::test]
async fn kakao_login_suffixes_taken_nickname() {
    let app = TestApp::new().await;
    app.signup_and_login("writer@diglog.com").await;

    let session = auth::login_with_kakao(&app.state, &kakao_profile("kakao@diglog.com", "writer"))
        .await
        .unwrap();
    let username = session.info.username;
    assert!(username.starts_with("writer_"), "{}", username);
    assert_eq!(username.len(), "writer_".len() + 4);
}

#[tokio::test]
async fn signup_after_window_counts_as_not_verified() {
    let app = TestApp::new().await;
    let email = "slow@diglog.com";

    app.request(Method::POST, "/api/verify", None, Some(json!({ "email": email })))
        .await;
    let code = app.mailer.last_code(email).unwrap();
    let res = app
        .request(Method::POST, "/api/verify/code", None, Some(json!({ "email": email, "code": code })))
        .await;
    assert_eq!(res.status, StatusCode::OK);

    db::verifications::set_created_at(&app.state.pool, email, "2000-01-01T00:00:00.000Z")
        .await
        .unwrap();
    let res = app
        .request(
            Method::POST,
            "/api/verify/signup",
            None,
            Some(json!({ "email": email, "password": PASSWORD, "code": code })),
        )
        .await;
    assert_eq!(res.error_code(), "SIGNUP_CODE_NOT_VERIFIED");
}
