use crate::error::AppError;
use crate::models::*;
use sqlx::{SqliteExecutor, SqlitePool};

pub async fn insert(
    executor: impl SqliteExecutor<'_>,
    post_id: &str,
    member_id: &str,
    content: &str,
    tagged_member_id: Option<&str>,
    parent_id: Option<&str>,
) -> Result<String, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO comments (id, post_id, member_id, content, tagged_member_id, parent_id)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(post_id)
    .bind(member_id)
    .bind(content)
    .bind(tagged_member_id)
    .bind(parent_id)
    .execute(executor)
    .await?;

    Ok(id)
}

pub async fn find_by_id(
    executor: impl SqliteExecutor<'_>,
    id: &str,
) -> Result<Option<Comment>, AppError> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, post_id, member_id, is_deleted
        FROM comments
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(comment)
}

/// 댓글의 깊이(조상 댓글 수)를 계산합니다.
///
/// 부모를 따라 올라가는 재귀 CTE이며 `max_depth`에서 탐색을 멈춥니다.
/// 따라서 실제 깊이가 `max_depth` 이상이면 `max_depth`가 반환됩니다.
/// 댓글이 없으면 `None`입니다.
pub async fn find_depth(
    pool: &SqlitePool,
    id: &str,
    max_depth: i64,
) -> Result<Option<i64>, AppError> {
    let depth = sqlx::query_scalar::<_, Option<i64>>(
        r#"
        WITH RECURSIVE ancestors(id, parent_id, depth) AS (
            SELECT id, parent_id, 0 FROM comments WHERE id = ?
            UNION ALL
            SELECT c.id, c.parent_id, a.depth + 1
            FROM comments c
            JOIN ancestors a ON c.id = a.parent_id
            WHERE a.depth < ?
        )
        SELECT MAX(depth) FROM ancestors
        "#,
    )
    .bind(id)
    .bind(max_depth)
    .fetch_one(pool)
    .await?;

    Ok(depth)
}

/// 게시글의 댓글 한 페이지. `parent_id`가 `None`이면 최상위 댓글입니다.
///
/// 삭제된 댓글은 목록에서 빠지지만, 그 답글은 부모 ID로 계속 조회할 수 있습니다.
pub async fn find_page(
    pool: &SqlitePool,
    post_id: &str,
    parent_id: Option<&str>,
    page: PageRequest,
) -> Result<(Vec<CommentView>, i64), AppError> {
    let comments = sqlx::query_as::<_, CommentView>(
        r#"
        SELECT c.id, m.username,
               (SELECT i.url FROM images i
                WHERE i.ref_id = m.id
                ORDER BY i.created_at DESC, i.rowid DESC
                LIMIT 1) AS profile_url,
               c.content, tm.username AS tagged_username, c.is_deleted, c.created_at,
               (SELECT COUNT(*) FROM comments r
                WHERE r.parent_id = c.id AND r.is_deleted = 0) AS reply_count
        FROM comments c
        JOIN members m ON m.id = c.member_id
        LEFT JOIN members tm ON tm.id = c.tagged_member_id
        WHERE c.post_id = ? AND c.parent_id IS ? AND c.is_deleted = 0
        ORDER BY c.created_at, c.rowid
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(post_id)
    .bind(parent_id)
    .bind(page.size)
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM comments WHERE post_id = ? AND parent_id IS ? AND is_deleted = 0",
    )
    .bind(post_id)
    .bind(parent_id)
    .fetch_one(pool)
    .await?;

    Ok((comments, total))
}

pub async fn update(
    pool: &SqlitePool,
    id: &str,
    content: &str,
    tagged_member_id: Option<&str>,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE comments
        SET content = ?, tagged_member_id = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(content)
    .bind(tagged_member_id)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// # 반환값
/// - `false`: 이미 삭제된 댓글
pub async fn soft_delete(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE comments
        SET is_deleted = 1, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND is_deleted = 0
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
