//! # 태그(Tag) 라우트 핸들러
//!
//! - `GET /api/tag/{username}` → 회원이 쓴 (삭제되지 않은) 게시글의 태그, 이름순

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{error::AppError, models::TagResponse, routes::AppState, services::tag};

pub async fn member_tags(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<TagResponse>>, AppError> {
    Ok(Json(tag::member_tags(&state.pool, &username).await?))
}
