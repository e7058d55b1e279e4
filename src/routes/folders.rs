//! # 폴더(Folder) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/folders/{username}` → 회원의 폴더 목록 (게시글 수 포함)
//! - `PUT    /api/folders` → 폴더 트리 일괄 저장
//! - `DELETE /api/folders` → 폴더 일괄 삭제 (204)
//!
//! 폴더를 삭제하면 DB 스키마의 `ON DELETE SET NULL`에 의해
//! 소프트 삭제된 게시글의 `folder_id`는 비워집니다.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::AppState,
    services::folder,
};

pub async fn list_folders(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<FolderPostCountResponse>>, AppError> {
    Ok(Json(folder::list_with_post_count(&state.pool, &username).await?))
}

/// 요청 본문: `[{ "id"?, "title", "depth", "orderIndex", "parentOrderIndex" }]`
pub async fn save_folders(
    State(state): State<AppState>,
    user: AuthUser,
    Json(requests): Json<Vec<FolderCreateRequest>>,
) -> Result<Json<Vec<FolderResponse>>, AppError> {
    Ok(Json(folder::save(&state.pool, &user.email, &requests).await?))
}

pub async fn delete_folders(
    State(state): State<AppState>,
    user: AuthUser,
    Json(requests): Json<Vec<FolderDeleteRequest>>,
) -> Result<StatusCode, AppError> {
    folder::delete(&state.pool, &user.email, &requests).await?;
    Ok(StatusCode::NO_CONTENT)
}
