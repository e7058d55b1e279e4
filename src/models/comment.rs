//! # 댓글 모델
//!
//! 댓글은 `parent_id`로 자기 자신을 참조하는 트리입니다.
//! 최상위 댓글의 깊이는 0이고, 답글은 최대 깊이 2까지 달 수 있습니다.

use serde::{Deserialize, Serialize};

/// 권한/상태 확인용 최소 컬럼
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub member_id: String,
    pub is_deleted: bool,
}

/// 목록 조회용 행: 작성자/태그된 회원 이름, 프로필 이미지, 답글 수를 함께 가져옵니다.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentView {
    pub id: String,
    pub username: String,
    pub profile_url: Option<String>,
    pub content: String,
    pub tagged_username: Option<String>,
    pub is_deleted: bool,
    pub created_at: String,
    pub reply_count: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub content: String,
    pub post_id: String,
    #[serde(default)]
    pub parent_comment_id: Option<String>,
    #[serde(default)]
    pub tagged_username: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentUpdateRequest {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub tagged_username: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentListQuery {
    pub post_id: String,
    #[serde(default)]
    pub parent_comment_id: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentMemberResponse {
    pub username: String,
    pub profile_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub member: CommentMemberResponse,
    pub content: String,
    pub tagged_username: Option<String>,
    pub is_deleted: bool,
    pub created_at: String,
    pub reply_count: i64,
}

impl From<CommentView> for CommentResponse {
    fn from(view: CommentView) -> Self {
        Self {
            id: view.id,
            member: CommentMemberResponse {
                username: view.username,
                profile_url: view.profile_url,
            },
            content: view.content,
            tagged_username: view.tagged_username,
            is_deleted: view.is_deleted,
            created_at: view.created_at,
            reply_count: view.reply_count,
        }
    }
}
