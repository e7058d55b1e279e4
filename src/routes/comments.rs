//! # 댓글(Comment) 라우트 핸들러
//!
//! - `POST  /api/comment` → 작성 (201, `{ "id": ... }`)
//! - `GET   /api/comment?postId=..&parentCommentId=..` → 한 단계의 댓글 목록 (오래된 순)
//! - `PATCH /api/comment` → 수정 (204)
//! - `PATCH /api/comment/delete/{id}` → 소프트 삭제 (204)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::AppState,
    services::comment,
};

pub async fn create_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CommentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let id = comment::create(&state.pool, &user.email, &req).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<CommentListQuery>,
) -> Result<Json<Page<CommentResponse>>, AppError> {
    Ok(Json(comment::list(&state.pool, &query).await?))
}

pub async fn update_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CommentUpdateRequest>,
) -> Result<StatusCode, AppError> {
    comment::update(&state.pool, &user.email, &req).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    comment::delete(&state.pool, &user.email, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
