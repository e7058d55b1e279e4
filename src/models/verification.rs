use serde::Deserialize;

/// `email_verifications` 테이블 한 행. 가입 전 이메일 소유 확인용 코드입니다.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmailVerification {
    pub id: String,
    pub code: String,
    pub verified: bool,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailVerifyRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct CodeVerifyRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub code: String,
}
