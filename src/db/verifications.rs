use crate::error::AppError;
use crate::models::EmailVerification;
use sqlx::{SqliteExecutor, SqlitePool};

pub async fn delete_by_email(
    executor: impl SqliteExecutor<'_>,
    email: &str,
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM email_verifications WHERE email = ?")
        .bind(email)
        .execute(executor)
        .await?;

    Ok(())
}

pub async fn create(pool: &SqlitePool, email: &str, code: &str) -> Result<(), AppError> {
    sqlx::query("INSERT INTO email_verifications (id, email, code) VALUES (?, ?, ?)")
        .bind(uuid::Uuid::now_v7().to_string())
        .bind(email)
        .bind(code)
        .execute(pool)
        .await?;

    Ok(())
}

/// 이메일로 발급된 가장 최근 코드
pub async fn find_latest(
    executor: impl SqliteExecutor<'_>,
    email: &str,
) -> Result<Option<EmailVerification>, AppError> {
    let row = sqlx::query_as::<_, EmailVerification>(
        r#"
        SELECT id, code, verified, created_at
        FROM email_verifications
        WHERE email = ?
        ORDER BY created_at DESC, rowid DESC
        LIMIT 1
        "#,
    )
    .bind(email)
    .fetch_optional(executor)
    .await?;

    Ok(row)
}

pub async fn mark_verified(pool: &SqlitePool, id: &str) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE email_verifications
        SET verified = 1, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// 테스트에서 코드 발급 시각을 과거로 돌릴 때 사용합니다.
#[cfg(test)]
pub async fn set_created_at(pool: &SqlitePool, email: &str, created_at: &str) -> Result<(), AppError> {
    sqlx::query("UPDATE email_verifications SET created_at = ? WHERE email = ?")
        .bind(created_at)
        .bind(email)
        .execute(pool)
        .await?;

    Ok(())
}
