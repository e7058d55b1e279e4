//! # 게시글 모델
//!
//! `PostView`는 게시글 + 작성자 이름 + 폴더 제목을 JOIN한 조회용 행입니다.
//! 목록/상세 응답은 모두 `PostView`에 태그 목록을 붙여 `PostResponse`로 만듭니다.

use serde::{Deserialize, Serialize};

use super::tag::TagResponse;

/// 권한/상태 확인용 최소 컬럼
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Post {
    pub id: String,
    pub member_id: String,
    pub is_deleted: bool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostView {
    pub id: String,
    pub member_id: String,
    pub username: String,
    pub folder_id: Option<String>,
    pub folder_title: Option<String>,
    pub title: String,
    pub content: String,
    pub created_at: String,
}

/// `POST /api/post` 요청 본문
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub tag_names: Vec<String>,
    /// 본문에 포함된 이미지 URL 목록
    #[serde(default)]
    pub urls: Vec<String>,
}

/// `PATCH /api/post` 요청 본문
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostUpdateRequest {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub tag_names: Vec<String>,
    #[serde(default)]
    pub urls: Vec<String>,
}

/// `PATCH /api/post/folder` 요청 본문. `folderId`가 null이면 폴더에서 뺍니다.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFolderUpdateRequest {
    pub post_ids: Vec<String>,
    #[serde(default)]
    pub folder_id: Option<String>,
}

/// `GET /api/post` 쿼리 (`sorts`는 반복 키 또는 쉼표 구분 모두 허용)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListQuery {
    #[serde(default)]
    pub sorts: Vec<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
    #[serde(default)]
    pub is_descending: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSearchQuery {
    #[serde(default)]
    pub keyword: String,
    pub option: String,
    #[serde(default)]
    pub sorts: Vec<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
    #[serde(default)]
    pub is_descending: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPostsQuery {
    pub username: String,
    #[serde(default)]
    pub folder_ids: Vec<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberTagPostsQuery {
    pub username: String,
    #[serde(default)]
    pub tag_id: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct PostFolderResponse {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub username: String,
    pub folder: Option<PostFolderResponse>,
    pub tags: Vec<TagResponse>,
    pub created_at: String,
}

impl PostResponse {
    pub fn new(view: PostView, tags: Vec<TagResponse>) -> Self {
        let folder = match (view.folder_id, view.folder_title) {
            (Some(id), Some(title)) => Some(PostFolderResponse { id, title }),
            _ => None,
        };
        Self {
            id: view.id,
            title: view.title,
            content: view.content,
            username: view.username,
            folder,
            tags,
            created_at: view.created_at,
        }
    }
}

/// 검색 대상
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOption {
    All,
    Title,
    Tag,
}

impl SearchOption {
    /// 대문자 그대로만 허용합니다. (`all`은 거부)
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ALL" => Some(SearchOption::All),
            "TITLE" => Some(SearchOption::Title),
            "TAG" => Some(SearchOption::Tag),
            _ => None,
        }
    }
}

/// 게시글 목록 정렬 기준
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostSort {
    CreatedAt,
    UpdatedAt,
    Title,
}

impl PostSort {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "createdAt" => Some(PostSort::CreatedAt),
            "updatedAt" => Some(PostSort::UpdatedAt),
            "title" => Some(PostSort::Title),
            _ => None,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            PostSort::CreatedAt => "p.created_at",
            PostSort::UpdatedAt => "p.updated_at",
            PostSort::Title => "p.title",
        }
    }
}
