//! # 메일 발송
//!
//! 인증 코드 메일은 `Mailer` 트레이트로 보냅니다.
//! 기본 구현 `LogMailer`는 메일 내용을 tracing 로그로 남깁니다.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("mail delivery failed: {0}")]
pub struct MailError(pub String);

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError>;
}

pub struct LogMailer {
    sender: String,
}

impl LogMailer {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        tracing::info!(from = %self.sender, %to, %subject, "{}", body);
        Ok(())
    }
}

/// 인증 코드 메일 본문
pub fn verification_mail(code: &str) -> (String, String) {
    (
        "[diglog] 이메일 인증 코드".to_string(),
        format!("diglog 회원가입 인증 코드는 [{}] 입니다. 10분 안에 입력해주세요.", code),
    )
}
