//! # 태그 쿼리
//!
//! 태그 이름은 전역 UNIQUE입니다. 게시글과는 `post_tags` 중간 테이블로 연결됩니다.
//!
//! ```sql
//! tags ←── post_tags ──→ posts
//!  (1)       (N:M)        (1)
//! ```

use crate::error::AppError;
use crate::models::*;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

/// 이름 목록에 해당하는 태그를 모두 확보합니다.
///
/// 이미 있는 이름은 `INSERT OR IGNORE`로 건너뛰고, 이후 이름으로 다시 조회하여
/// 기존 태그와 새 태그를 함께 반환합니다. (입력 순서 유지)
pub async fn save_all(conn: &mut SqliteConnection, names: &[String]) -> Result<Vec<Tag>, AppError> {
    let mut tags = Vec::with_capacity(names.len());

    for name in names {
        sqlx::query("INSERT OR IGNORE INTO tags (id, name) VALUES (?, ?)")
            .bind(uuid::Uuid::now_v7().to_string())
            .bind(name)
            .execute(&mut *conn)
            .await?;

        let tag = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE name = ?")
            .bind(name)
            .fetch_one(&mut *conn)
            .await?;
        tags.push(tag);
    }

    Ok(tags)
}

/// 게시글의 태그 연결을 주어진 목록으로 교체합니다.
pub async fn replace_post_tags(
    conn: &mut SqliteConnection,
    post_id: &str,
    tag_ids: &[String],
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM post_tags WHERE post_id = ?")
        .bind(post_id)
        .execute(&mut *conn)
        .await?;

    for tag_id in tag_ids {
        sqlx::query("INSERT OR IGNORE INTO post_tags (post_id, tag_id) VALUES (?, ?)")
            .bind(post_id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

/// 여러 게시글의 태그를 한 번에 조회합니다. (게시글 ID, 태그 이름 순)
pub async fn find_by_post_ids(
    pool: &SqlitePool,
    post_ids: &[String],
) -> Result<Vec<PostTag>, AppError> {
    if post_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder = QueryBuilder::<Sqlite>::new(
        "SELECT pt.post_id, t.id, t.name FROM post_tags pt JOIN tags t ON t.id = pt.tag_id WHERE pt.post_id IN (",
    );
    let mut separated = builder.separated(", ");
    for id in post_ids {
        separated.push_bind(id.as_str());
    }
    separated.push_unseparated(") ORDER BY pt.post_id, t.name");

    let rows = builder.build_query_as::<PostTag>().fetch_all(pool).await?;
    Ok(rows)
}

pub async fn exists(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tags WHERE id = ?)")
        .bind(id)
        .fetch_one(pool)
        .await?;

    Ok(exists)
}

/// 회원의 삭제되지 않은 게시글에 달린 태그 (중복 제거, 이름순)
pub async fn find_by_member(
    pool: &SqlitePool,
    member_id: &str,
) -> Result<Vec<TagResponse>, AppError> {
    let tags = sqlx::query_as::<_, TagResponse>(
        r#"
        SELECT DISTINCT t.id, t.name
        FROM tags t
        JOIN post_tags pt ON pt.tag_id = t.id
        JOIN posts p ON p.id = pt.post_id
        WHERE p.member_id = ? AND p.is_deleted = 0
        ORDER BY t.name
        "#,
    )
    .bind(member_id)
    .fetch_all(pool)
    .await?;

    Ok(tags)
}
