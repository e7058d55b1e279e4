//! # 댓글 서비스
//!
//! 댓글 깊이: 최상위 댓글 0, 답글 1, 답글의 답글 2까지 허용합니다.
//! 부모 댓글의 깊이는 DB의 재귀 CTE(`db::comments::find_depth`)로 계산합니다.

use sqlx::SqlitePool;

use crate::{
    db,
    error::{AppError, ErrorCode},
    models::*,
    services::member,
};

pub const MAX_DEPTH: i64 = 2;

/// 부모 깊이에 답글을 달 수 있는지 확인합니다.
pub fn check_reply_depth(parent_depth: i64) -> Result<(), ErrorCode> {
    if parent_depth + 1 > MAX_DEPTH {
        return Err(ErrorCode::CommentMaxDepthExceeded);
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<(), AppError> {
    if content.trim().is_empty() {
        return Err(AppError::validation("content", "댓글 내용을 입력해주세요."));
    }
    Ok(())
}

/// 태그된 회원 이름을 ID로 바꿉니다. 빈 이름은 태그 없음으로 취급합니다.
async fn tagged_member_id(
    pool: &SqlitePool,
    tagged_username: Option<&str>,
) -> Result<Option<String>, AppError> {
    let Some(username) = tagged_username.map(str::trim).filter(|u| !u.is_empty()) else {
        return Ok(None);
    };
    let tagged = db::members::find_active_by_username(pool, username)
        .await?
        .ok_or(ErrorCode::MemberUsernameNotFound)?;
    Ok(Some(tagged.id))
}

pub async fn create(pool: &SqlitePool, email: &str, req: &CommentRequest) -> Result<String, AppError> {
    validate_content(&req.content)?;
    let member = member::current_member(pool, email).await?;

    db::posts::find_by_id(pool, &req.post_id)
        .await?
        .filter(|p| !p.is_deleted)
        .ok_or(ErrorCode::PostNotFound)?;

    let parent_id = req.parent_comment_id.as_deref().filter(|id| !id.is_empty());
    if let Some(parent_id) = parent_id {
        db::comments::find_by_id(pool, parent_id)
            .await?
            .filter(|c| !c.is_deleted && c.post_id == req.post_id)
            .ok_or(ErrorCode::CommentParentIdNotFound)?;

        let parent_depth = db::comments::find_depth(pool, parent_id, MAX_DEPTH)
            .await?
            .ok_or(ErrorCode::CommentParentIdNotFound)?;
        check_reply_depth(parent_depth)?;
    }

    let tagged = tagged_member_id(pool, req.tagged_username.as_deref()).await?;
    let id = db::comments::insert(
        pool,
        &req.post_id,
        &member.id,
        req.content.trim(),
        tagged.as_deref(),
        parent_id,
    )
    .await?;

    tracing::debug!(comment_id = %id, post_id = %req.post_id, "comment created");
    Ok(id)
}

pub async fn list(
    pool: &SqlitePool,
    query: &CommentListQuery,
) -> Result<Page<CommentResponse>, AppError> {
    let page = PageRequest::new(query.page, query.size);
    let parent_id = query.parent_comment_id.as_deref().filter(|id| !id.is_empty());

    let (views, total) = db::comments::find_page(pool, &query.post_id, parent_id, page).await?;
    Ok(Page::new(views, page, total).map(CommentResponse::from))
}

pub async fn update(pool: &SqlitePool, email: &str, req: &CommentUpdateRequest) -> Result<(), AppError> {
    validate_content(&req.content)?;
    let member = member::current_member(pool, email).await?;

    let comment = db::comments::find_by_id(pool, &req.id)
        .await?
        .ok_or(ErrorCode::CommentNotFound)?;
    if comment.member_id != member.id {
        return Err(ErrorCode::CommentNoPermission.into());
    }
    if comment.is_deleted {
        return Err(ErrorCode::CommentIsDeletedNoChange.into());
    }

    let tagged = tagged_member_id(pool, req.tagged_username.as_deref()).await?;
    db::comments::update(pool, &comment.id, req.content.trim(), tagged.as_deref()).await
}

pub async fn delete(pool: &SqlitePool, email: &str, id: &str) -> Result<(), AppError> {
    let member = member::current_member(pool, email).await?;

    let comment = db::comments::find_by_id(pool, id)
        .await?
        .ok_or(ErrorCode::CommentNotFound)?;
    if comment.member_id != member.id {
        return Err(ErrorCode::CommentNoPermission.into());
    }
    if !db::comments::soft_delete(pool, id).await? {
        return Err(ErrorCode::CommentIsDeletedNoChange.into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replies_allowed_up_to_depth_two() {
        assert!(check_reply_depth(0).is_ok());
        assert!(check_reply_depth(1).is_ok());
        assert_eq!(check_reply_depth(2), Err(ErrorCode::CommentMaxDepthExceeded));
    }
}
