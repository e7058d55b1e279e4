//! # 회원 모델
//!
//! - `Member`: `members` 테이블 한 행
//! - `Platform`: 가입 경로 (자체 가입 / 카카오)
//! - 로그인, 프로필 조회/수정에 쓰이는 요청·응답 DTO

use serde::{Deserialize, Serialize};

pub const ROLE_USER: &str = "ROLE_USER";

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Member {
    pub id: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub platform: String,
    pub is_deleted: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Member {
    pub fn platform(&self) -> Platform {
        Platform::from_db(&self.platform)
    }
}

/// 회원 가입 경로
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Server,
    Kakao,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Server => "SERVER",
            Platform::Kakao => "KAKAO",
        }
    }

    // CHECK 제약으로 두 값만 저장되므로 나머지는 SERVER로 취급합니다.
    pub fn from_db(value: &str) -> Self {
        match value {
            "KAKAO" => Platform::Kakao,
            _ => Platform::Server,
        }
    }
}

/// `POST /api/member/login` 요청 본문
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 로그인/토큰 갱신 성공 응답
///
/// `status`는 본문 안에서 성공 여부를 구분하기 위한 값입니다.
/// (refresh 실패 시에는 HTTP 200에 `{"status":401}`만 내려갑니다)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfoResponse {
    pub status: u16,
    pub email: String,
    pub username: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct MemberUsernameRequest {
    pub username: String,
}

/// `GET /api/member/profile` 응답 (로그인한 본인)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfileResponse {
    pub email: String,
    pub username: String,
    pub profile_url: Option<String>,
}

/// 다른 회원의 공개 프로필
#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfileInfoResponse {
    pub username: String,
    pub profile_url: Option<String>,
}
