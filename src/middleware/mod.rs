//! # 미들웨어 모듈
//!
//! - `auth`: JWT 발급/검증, 인증 추출기(`AuthUser`, `AdminUser`), refresh 쿠키

pub mod auth;
