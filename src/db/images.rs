use crate::error::AppError;
use sqlx::SqliteExecutor;

pub async fn insert(
    executor: impl SqliteExecutor<'_>,
    ref_id: &str,
    url: &str,
) -> Result<(), AppError> {
    sqlx::query("INSERT INTO images (id, ref_id, url) VALUES (?, ?, ?)")
        .bind(uuid::Uuid::now_v7().to_string())
        .bind(ref_id)
        .bind(url)
        .execute(executor)
        .await?;

    Ok(())
}

pub async fn find_urls_by_ref(
    executor: impl SqliteExecutor<'_>,
    ref_id: &str,
) -> Result<Vec<String>, AppError> {
    let urls = sqlx::query_scalar::<_, String>(
        "SELECT url FROM images WHERE ref_id = ? ORDER BY created_at, rowid",
    )
    .bind(ref_id)
    .fetch_all(executor)
    .await?;

    Ok(urls)
}

pub async fn delete_by_ref_and_url(
    executor: impl SqliteExecutor<'_>,
    ref_id: &str,
    url: &str,
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM images WHERE ref_id = ? AND url = ?")
        .bind(ref_id)
        .bind(url)
        .execute(executor)
        .await?;

    Ok(())
}

pub async fn delete_by_ref(executor: impl SqliteExecutor<'_>, ref_id: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM images WHERE ref_id = ?")
        .bind(ref_id)
        .execute(executor)
        .await?;

    Ok(())
}

/// 다른 `ref_id`(회원 또는 게시글)가 이미 이 URL을 가지고 있는지
pub async fn is_held_by_other(
    executor: impl SqliteExecutor<'_>,
    url: &str,
    ref_id: &str,
) -> Result<bool, AppError> {
    let held = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM images WHERE url = ? AND ref_id <> ?)",
    )
    .bind(url)
    .bind(ref_id)
    .fetch_one(executor)
    .await?;

    Ok(held)
}

pub async fn count_by_url(executor: impl SqliteExecutor<'_>, url: &str) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM images WHERE url = ?")
        .bind(url)
        .fetch_one(executor)
        .await?;

    Ok(count)
}
