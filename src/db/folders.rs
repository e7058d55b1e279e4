//! # 폴더 쿼리
//!
//! 폴더 일괄 저장/삭제는 서비스 계층에서 트랜잭션으로 묶어 호출합니다.
//! 그래서 대부분의 함수가 `impl SqliteExecutor`를 받습니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::{SqliteExecutor, SqlitePool};

pub async fn find_by_id(
    executor: impl SqliteExecutor<'_>,
    id: &str,
) -> Result<Option<Folder>, AppError> {
    let folder = sqlx::query_as::<_, Folder>(
        r#"
        SELECT id, member_id, title, depth, order_index, parent_id
        FROM folders
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(folder)
}

pub async fn find_by_member(
    executor: impl SqliteExecutor<'_>,
    member_id: &str,
) -> Result<Vec<Folder>, AppError> {
    let folders = sqlx::query_as::<_, Folder>(
        r#"
        SELECT id, member_id, title, depth, order_index, parent_id
        FROM folders
        WHERE member_id = ?
        ORDER BY order_index
        "#,
    )
    .bind(member_id)
    .fetch_all(executor)
    .await?;

    Ok(folders)
}

/// 회원의 폴더 목록과 폴더별 삭제되지 않은 게시글 수
pub async fn find_with_post_count(
    pool: &SqlitePool,
    member_id: &str,
) -> Result<Vec<FolderWithPostCount>, AppError> {
    let folders = sqlx::query_as::<_, FolderWithPostCount>(
        r#"
        SELECT f.id, f.title, f.depth, f.order_index, f.parent_id,
               (SELECT COUNT(*) FROM posts p
                WHERE p.folder_id = f.id AND p.is_deleted = 0) AS post_count
        FROM folders f
        WHERE f.member_id = ?
        ORDER BY f.order_index
        "#,
    )
    .bind(member_id)
    .fetch_all(pool)
    .await?;

    Ok(folders)
}

pub async fn insert(executor: impl SqliteExecutor<'_>, folder: &Folder) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO folders (id, member_id, title, depth, order_index, parent_id)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&folder.id)
    .bind(&folder.member_id)
    .bind(&folder.title)
    .bind(folder.depth)
    .bind(folder.order_index)
    .bind(&folder.parent_id)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn update(executor: impl SqliteExecutor<'_>, folder: &Folder) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE folders
        SET title = ?, depth = ?, order_index = ?, parent_id = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(&folder.title)
    .bind(folder.depth)
    .bind(folder.order_index)
    .bind(&folder.parent_id)
    .bind(&folder.id)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn find_children(
    executor: impl SqliteExecutor<'_>,
    parent_id: &str,
) -> Result<Vec<Folder>, AppError> {
    let folders = sqlx::query_as::<_, Folder>(
        r#"
        SELECT id, member_id, title, depth, order_index, parent_id
        FROM folders
        WHERE parent_id = ?
        ORDER BY order_index
        "#,
    )
    .bind(parent_id)
    .fetch_all(executor)
    .await?;

    Ok(folders)
}

/// 폴더를 삭제합니다. 게시글의 `folder_id`는 외래키(ON DELETE SET NULL)로 비워집니다.
pub async fn delete(executor: impl SqliteExecutor<'_>, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM folders WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
