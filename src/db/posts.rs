//! # 게시글 쿼리
//!
//! 목록 조회는 `PostFilter`로 조건을 고르고 `QueryBuilder`로 WHERE/ORDER BY를 조립합니다.
//! 같은 WHERE 절을 COUNT 쿼리에도 사용하여 페이지 정보를 계산합니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqliteExecutor, SqlitePool};

use super::like_pattern;

const VIEW_SELECT: &str = r#"
    SELECT p.id, p.member_id, m.username, p.folder_id, f.title AS folder_title,
           p.title, p.content, p.created_at
    FROM posts p
    JOIN members m ON m.id = p.member_id
    LEFT JOIN folders f ON f.id = p.folder_id
"#;

/// 목록 조회 조건. 삭제된 게시글은 항상 제외됩니다.
#[derive(Debug, Clone)]
pub enum PostFilter<'a> {
    All,
    Search {
        keyword: &'a str,
        option: SearchOption,
    },
    /// `folder_ids`가 비어 있으면 회원의 모든 게시글
    Member {
        member_id: &'a str,
        folder_ids: &'a [String],
    },
    /// `tag_id`가 없으면 회원의 모든 게시글
    MemberTag {
        member_id: &'a str,
        tag_id: Option<&'a str>,
    },
}

fn push_where<'a>(builder: &mut QueryBuilder<'a, Sqlite>, filter: &PostFilter<'a>) {
    builder.push(" WHERE p.is_deleted = 0");

    match filter {
        PostFilter::All => {}
        PostFilter::Search { keyword, option } => {
            let pattern = like_pattern(keyword);
            let title = "LOWER(p.title) LIKE LOWER(";
            let tag = "EXISTS (SELECT 1 FROM post_tags pt JOIN tags t ON t.id = pt.tag_id \
                       WHERE pt.post_id = p.id AND LOWER(t.name) LIKE LOWER(";
            match option {
                SearchOption::Title => {
                    builder.push(" AND ").push(title).push_bind(pattern).push(") ESCAPE '\\'");
                }
                SearchOption::Tag => {
                    builder.push(" AND ").push(tag).push_bind(pattern).push(") ESCAPE '\\')");
                }
                SearchOption::All => {
                    builder
                        .push(" AND (")
                        .push(title)
                        .push_bind(pattern.clone())
                        .push(") ESCAPE '\\' OR ")
                        .push(tag)
                        .push_bind(pattern)
                        .push(") ESCAPE '\\'))");
                }
            }
        }
        PostFilter::Member {
            member_id,
            folder_ids,
        } => {
            builder.push(" AND p.member_id = ").push_bind(*member_id);
            if !folder_ids.is_empty() {
                builder.push(" AND p.folder_id IN (");
                let mut separated = builder.separated(", ");
                for folder_id in *folder_ids {
                    separated.push_bind(folder_id.as_str());
                }
                separated.push_unseparated(")");
            }
        }
        PostFilter::MemberTag { member_id, tag_id } => {
            builder.push(" AND p.member_id = ").push_bind(*member_id);
            if let Some(tag_id) = tag_id {
                builder
                    .push(" AND EXISTS (SELECT 1 FROM post_tags pt WHERE pt.post_id = p.id AND pt.tag_id = ")
                    .push_bind(*tag_id)
                    .push(")");
            }
        }
    }
}

/// 조건에 맞는 게시글 한 페이지와 전체 개수를 반환합니다.
///
/// 정렬 기준 뒤에는 항상 `p.id`가 붙어 같은 값끼리도 순서가 고정됩니다.
pub async fn find_page(
    pool: &SqlitePool,
    filter: &PostFilter<'_>,
    sorts: &[PostSort],
    descending: bool,
    page: PageRequest,
) -> Result<(Vec<PostView>, i64), AppError> {
    let direction = if descending { "DESC" } else { "ASC" };

    let mut builder = QueryBuilder::<Sqlite>::new(VIEW_SELECT);
    push_where(&mut builder, filter);
    builder.push(" ORDER BY ");
    for sort in sorts {
        builder.push(sort.column()).push(" ").push(direction).push(", ");
    }
    builder.push("p.id ").push(direction);
    builder
        .push(" LIMIT ")
        .push_bind(page.size)
        .push(" OFFSET ")
        .push_bind(page.offset());

    let posts = builder.build_query_as::<PostView>().fetch_all(pool).await?;

    let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM posts p");
    push_where(&mut count, filter);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    Ok((posts, total))
}

/// 삭제 여부와 관계없이 게시글을 조회합니다. (권한 검사용)
pub async fn find_by_id(
    executor: impl SqliteExecutor<'_>,
    id: &str,
) -> Result<Option<Post>, AppError> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, member_id, is_deleted
        FROM posts
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(post)
}

/// 삭제되지 않은 게시글의 상세 정보
pub async fn find_view(
    executor: impl SqliteExecutor<'_>,
    id: &str,
) -> Result<Option<PostView>, AppError> {
    let post = sqlx::query_as::<_, PostView>(&format!(
        "{} WHERE p.id = ? AND p.is_deleted = 0",
        VIEW_SELECT
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(post)
}

pub async fn insert(
    conn: &mut SqliteConnection,
    member_id: &str,
    folder_id: Option<&str>,
    title: &str,
    content: &str,
) -> Result<String, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO posts (id, member_id, folder_id, title, content)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(member_id)
    .bind(folder_id)
    .bind(title)
    .bind(content)
    .execute(conn)
    .await?;

    Ok(id)
}

pub async fn update(
    conn: &mut SqliteConnection,
    id: &str,
    folder_id: Option<&str>,
    title: &str,
    content: &str,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE posts
        SET folder_id = ?, title = ?, content = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(folder_id)
    .bind(title)
    .bind(content)
    .bind(id)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn update_folder(
    conn: &mut SqliteConnection,
    id: &str,
    folder_id: Option<&str>,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE posts
        SET folder_id = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(folder_id)
    .bind(id)
    .execute(conn)
    .await?;

    Ok(())
}

/// 작성자 본인의 삭제되지 않은 게시글만 소프트 삭제합니다.
///
/// # 반환값
/// - `true`: 삭제됨
/// - `false`: 없는 게시글이거나, 이미 삭제되었거나, 작성자가 아님
pub async fn soft_delete(pool: &SqlitePool, id: &str, member_id: &str) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE posts
        SET is_deleted = 1, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND member_id = ? AND is_deleted = 0
        "#,
    )
    .bind(id)
    .bind(member_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// 폴더에 남아 있는 삭제되지 않은 게시글 하나의 제목 (폴더 삭제 가드용)
pub async fn find_live_title_in_folder(
    executor: impl SqliteExecutor<'_>,
    folder_id: &str,
) -> Result<Option<String>, AppError> {
    let title = sqlx::query_scalar::<_, String>(
        r#"
        SELECT title FROM posts
        WHERE folder_id = ? AND is_deleted = 0
        ORDER BY created_at, rowid
        LIMIT 1
        "#,
    )
    .bind(folder_id)
    .fetch_optional(executor)
    .await?;

    Ok(title)
}
