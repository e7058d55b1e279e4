//! # 게시글(Post) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST  /api/post` → 작성 (201, `{ "id": ... }`)
//! - `PATCH /api/post` → 수정
//! - `PATCH /api/post/folder` → 여러 게시글의 폴더 이동
//! - `GET   /api/post/{id}` → 단건 조회
//! - `GET   /api/post` → 전체 목록 (`sorts`, `isDescending`)
//! - `GET   /api/post/search` → 제목/태그 검색
//! - `GET   /api/post/member` → 회원별 목록 (`folderIds`로 폴더 제한)
//! - `GET   /api/post/member/tag` → 회원별 태그 목록
//! - `PATCH /api/post/delete/{id}` → 소프트 삭제
//!
//! 목록 쿼리는 `sorts=title&sorts=createdAt`처럼 같은 키가 반복될 수 있어
//! `axum_extra::extract::Query`로 받습니다.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Query;
use serde_json::{json, Value};

use crate::{
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::AppState,
    services::post,
};

pub async fn create_post(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<PostRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let id = post::create(&state, &user.email, &req).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub async fn update_post(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<PostUpdateRequest>,
) -> Result<StatusCode, AppError> {
    post::update(&state, &user.email, &req).await?;
    Ok(StatusCode::OK)
}

pub async fn move_posts(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<PostFolderUpdateRequest>,
) -> Result<StatusCode, AppError> {
    post::move_to_folder(&state, &user.email, &req).await?;
    Ok(StatusCode::OK)
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PostResponse>, AppError> {
    Ok(Json(post::get(&state.pool, &id).await?))
}

pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PostListQuery>,
) -> Result<Json<Page<PostResponse>>, AppError> {
    Ok(Json(post::list(&state.pool, &query).await?))
}

pub async fn search_posts(
    State(state): State<AppState>,
    Query(query): Query<PostSearchQuery>,
) -> Result<Json<Page<PostResponse>>, AppError> {
    Ok(Json(post::search(&state.pool, &query).await?))
}

pub async fn member_posts(
    State(state): State<AppState>,
    Query(query): Query<MemberPostsQuery>,
) -> Result<Json<Page<PostResponse>>, AppError> {
    Ok(Json(post::member_posts(&state.pool, &query).await?))
}

pub async fn member_tag_posts(
    State(state): State<AppState>,
    Query(query): Query<MemberTagPostsQuery>,
) -> Result<Json<Page<PostResponse>>, AppError> {
    Ok(Json(post::member_tag_posts(&state.pool, &query).await?))
}

pub async fn delete_post(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    post::delete(&state.pool, &user.email, &id).await?;
    Ok(StatusCode::OK)
}
