//! # 이미지 업로드 핸들러
//!
//! - `POST /api/image` (multipart, 필드명 `file`) → `{ "url": "..." }`
//!
//! 게시글 본문에 넣을 이미지를 먼저 올리고, 돌려받은 URL을 게시글 저장 시 `urls`로 보냅니다.

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::{
    error::{AppError, ErrorCode},
    middleware::auth::AuthUser,
    models::ImageUrlResponse,
    routes::AppState,
    services::image::{self, ImageUpload},
};

/// multipart 본문에서 `file` 필드를 꺼냅니다. 없으면 `IMAGE_WRONG_FILE`입니다.
pub async fn read_upload(mut multipart: Multipart) -> Result<ImageUpload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ErrorCode::ImageWrongFile)?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("image").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|_| ErrorCode::ImageWrongFile)?;

        return Ok(ImageUpload {
            file_name,
            content_type,
            bytes,
        });
    }

    Err(ErrorCode::ImageWrongFile.into())
}

pub async fn upload_image(
    State(state): State<AppState>,
    _user: AuthUser,
    multipart: Multipart,
) -> Result<Json<ImageUrlResponse>, AppError> {
    let upload = read_upload(multipart).await?;
    let url = image::upload(state.store.as_ref(), upload).await?;
    Ok(Json(ImageUrlResponse { url }))
}
