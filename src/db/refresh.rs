//! # refresh 토큰 저장소
//!
//! 토큰 원문 대신 SHA-256 해시만 저장합니다.
//! 한 이메일에는 항상 가장 최근에 발급된 토큰 하나만 남습니다.

use crate::error::AppError;
use sqlx::SqlitePool;

/// 이메일의 기존 토큰을 모두 지우고 새 토큰 해시를 저장합니다.
pub async fn replace_refresh_token(
    pool: &SqlitePool,
    email: &str,
    token_hash: &str,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM refresh_tokens WHERE email = ?")
        .bind(email)
        .execute(&mut *tx)
        .await?;

    sqlx::query("INSERT INTO refresh_tokens (id, email, token_hash) VALUES (?, ?, ?)")
        .bind(uuid::Uuid::now_v7().to_string())
        .bind(email)
        .bind(token_hash)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// 해시로 저장된 토큰의 이메일을 찾습니다.
pub async fn find_email_by_token_hash(
    pool: &SqlitePool,
    token_hash: &str,
) -> Result<Option<String>, AppError> {
    let email = sqlx::query_scalar::<_, String>(
        "SELECT email FROM refresh_tokens WHERE token_hash = ?",
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;

    Ok(email)
}

pub async fn delete_by_email(pool: &SqlitePool, email: &str) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM refresh_tokens WHERE email = ?")
        .bind(email)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
