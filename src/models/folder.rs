//! # 폴더 모델
//!
//! 폴더는 회원별 트리 구조입니다. (깊이 0..=2, 최대 100개)
//! `order_index`는 회원의 전체 폴더 목록에서의 표시 순서이며 회원 안에서 유일합니다.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Folder {
    pub id: String,
    pub member_id: String,
    pub title: String,
    pub depth: i64,
    pub order_index: i64,
    pub parent_id: Option<String>,
}

/// 폴더 + 삭제되지 않은 게시글 수
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FolderWithPostCount {
    pub id: String,
    pub title: String,
    pub depth: i64,
    pub order_index: i64,
    pub parent_id: Option<String>,
    pub post_count: i64,
}

/// `PUT /api/folders` 요청 목록의 한 항목
///
/// `id`가 없으면 새 폴더, 있으면 기존 폴더 수정입니다.
/// 부모는 ID가 아니라 같은 요청 안의 `parentOrderIndex`로 가리킵니다. (깊이 0이면 무시)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderCreateRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub depth: i64,
    pub order_index: i64,
    #[serde(default)]
    pub parent_order_index: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderDeleteRequest {
    pub folder_id: String,
}

/// 저장 결과. 부모가 없으면 `parentFolderId`는 `"none"`입니다.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderResponse {
    pub folder_id: String,
    pub title: String,
    pub depth: i64,
    pub order_index: i64,
    pub parent_folder_id: String,
}

impl From<Folder> for FolderResponse {
    fn from(folder: Folder) -> Self {
        Self {
            folder_id: folder.id,
            title: folder.title,
            depth: folder.depth,
            order_index: folder.order_index,
            parent_folder_id: folder.parent_id.unwrap_or_else(|| "none".to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderPostCountResponse {
    pub folder_id: String,
    pub title: String,
    pub depth: i64,
    pub order_index: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_folder_id: Option<String>,
    pub post_count: i64,
}

impl From<FolderWithPostCount> for FolderPostCountResponse {
    fn from(folder: FolderWithPostCount) -> Self {
        Self {
            folder_id: folder.id,
            title: folder.title,
            depth: folder.depth,
            order_index: folder.order_index,
            parent_folder_id: folder.parent_id,
            post_count: folder.post_count,
        }
    }
}
