//! # 회원 쿼리
//!
//! 단일 쿼리 함수는 `impl SqliteExecutor`를 받아 풀(`&pool`)과
//! 트랜잭션(`&mut *tx`) 양쪽에서 호출할 수 있습니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

use super::like_pattern;

const MEMBER_COLUMNS: &str =
    "id, email, username, password_hash, platform, is_deleted, created_at, updated_at";

/// 회원과 기본 권한(ROLE_USER)을 함께 저장합니다.
pub async fn create_member(
    conn: &mut SqliteConnection,
    email: &str,
    username: &str,
    password_hash: &str,
    platform: Platform,
) -> Result<Member, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO members (id, email, username, password_hash, platform)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(email)
    .bind(username)
    .bind(password_hash)
    .bind(platform.as_str())
    .execute(&mut *conn)
    .await?;

    sqlx::query("INSERT INTO member_roles (member_id, role) VALUES (?, ?)")
        .bind(&id)
        .bind(ROLE_USER)
        .execute(&mut *conn)
        .await?;

    find_by_id(&mut *conn, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created member".to_string()))
}

pub async fn find_by_id(
    executor: impl SqliteExecutor<'_>,
    id: &str,
) -> Result<Option<Member>, AppError> {
    let member = sqlx::query_as::<_, Member>(&format!(
        "SELECT {} FROM members WHERE id = ?",
        MEMBER_COLUMNS
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(member)
}

pub async fn find_by_email(
    executor: impl SqliteExecutor<'_>,
    email: &str,
) -> Result<Option<Member>, AppError> {
    let member = sqlx::query_as::<_, Member>(&format!(
        "SELECT {} FROM members WHERE email = ?",
        MEMBER_COLUMNS
    ))
    .bind(email)
    .fetch_optional(executor)
    .await?;

    Ok(member)
}

/// 탈퇴하지 않은 회원만 조회합니다.
pub async fn find_active_by_username(
    executor: impl SqliteExecutor<'_>,
    username: &str,
) -> Result<Option<Member>, AppError> {
    let member = sqlx::query_as::<_, Member>(&format!(
        "SELECT {} FROM members WHERE username = ? AND is_deleted = 0",
        MEMBER_COLUMNS
    ))
    .bind(username)
    .fetch_optional(executor)
    .await?;

    Ok(member)
}

/// 탈퇴 여부와 관계없이 이름이 사용 중인지 확인합니다. (UNIQUE 제약 기준)
pub async fn username_exists(
    executor: impl SqliteExecutor<'_>,
    username: &str,
) -> Result<bool, AppError> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM members WHERE username = ?)")
            .bind(username)
            .fetch_one(executor)
            .await?;

    Ok(exists)
}

pub async fn find_roles(
    executor: impl SqliteExecutor<'_>,
    member_id: &str,
) -> Result<Vec<String>, AppError> {
    let roles = sqlx::query_scalar::<_, String>(
        "SELECT role FROM member_roles WHERE member_id = ? ORDER BY role",
    )
    .bind(member_id)
    .fetch_all(executor)
    .await?;

    Ok(roles)
}

pub async fn update_username(
    pool: &SqlitePool,
    member_id: &str,
    username: &str,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE members
        SET username = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(username)
    .bind(member_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// 가장 최근에 등록된 프로필 이미지 URL
pub async fn find_profile_url(
    executor: impl SqliteExecutor<'_>,
    member_id: &str,
) -> Result<Option<String>, AppError> {
    let url = sqlx::query_scalar::<_, String>(
        r#"
        SELECT url FROM images
        WHERE ref_id = ?
        ORDER BY created_at DESC, rowid DESC
        LIMIT 1
        "#,
    )
    .bind(member_id)
    .fetch_optional(executor)
    .await?;

    Ok(url)
}

/// 이름에 `keyword`가 포함된 회원 검색 (대소문자 무시, 탈퇴 회원 제외, 최신 가입순)
pub async fn search_by_username(
    pool: &SqlitePool,
    keyword: &str,
    limit: i64,
    offset: i64,
) -> Result<(Vec<MemberProfileInfoResponse>, i64), AppError> {
    let pattern = like_pattern(keyword);

    let rows = sqlx::query_as::<_, MemberProfileInfoResponse>(
        r#"
        SELECT m.username,
               (SELECT i.url FROM images i
                WHERE i.ref_id = m.id
                ORDER BY i.created_at DESC, i.rowid DESC
                LIMIT 1) AS profile_url
        FROM members m
        WHERE m.is_deleted = 0 AND LOWER(m.username) LIKE LOWER(?) ESCAPE '\'
        ORDER BY m.created_at DESC, m.rowid DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(&pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM members
        WHERE is_deleted = 0 AND LOWER(username) LIKE LOWER(?) ESCAPE '\'
        "#,
    )
    .bind(&pattern)
    .fetch_one(pool)
    .await?;

    Ok((rows, total))
}
