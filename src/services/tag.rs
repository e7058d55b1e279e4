use sqlx::SqlitePool;

use crate::{db, error::AppError, models::TagResponse};

/// 공백 제거, 빈 이름 제외, 중복 제거 (처음 나온 순서 유지)
pub fn normalize_names(names: &[String]) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    for name in names {
        let name = name.trim();
        if !name.is_empty() && !result.iter().any(|n| n == name) {
            result.push(name.to_string());
        }
    }
    result
}

/// 회원이 쓴 게시글의 태그 목록. 없는 회원이면 빈 목록입니다.
pub async fn member_tags(pool: &SqlitePool, username: &str) -> Result<Vec<TagResponse>, AppError> {
    match db::members::find_active_by_username(pool, username).await? {
        Some(member) => db::tags::find_by_member(pool, &member.id).await,
        None => Ok(Vec::new()),
    }
}
