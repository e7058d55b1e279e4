//! # 이미지 업로드
//!
//! 업로드 파일을 검증하고 날짜별 키(`diglog/YY/MM/DD/<uuid>_<파일명>`)로 저장합니다.

use axum::body::Bytes;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::{
    db,
    error::{AppError, ErrorCode},
    services::storage::ObjectStore,
};

/// multipart `file` 필드에서 꺼낸 업로드 파일
#[derive(Debug)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

pub async fn upload(store: &dyn ObjectStore, upload: ImageUpload) -> Result<String, AppError> {
    if !upload.content_type.starts_with("image/") || upload.bytes.is_empty() {
        return Err(ErrorCode::ImageWrongFile.into());
    }

    let key = object_key(&upload.file_name, Utc::now());
    store.put(&key, upload.bytes).await?;
    tracing::debug!("image stored: {}", key);

    Ok(store.url_for(&key))
}

/// 저장소가 발급한 URL이면 원본을 지웁니다. 외부 URL은 무시합니다.
pub async fn delete_by_url(store: &dyn ObjectStore, url: &str) -> Result<(), AppError> {
    match store.key_for_url(url) {
        Some(key) => store.delete(&key).await,
        None => Ok(()),
    }
}

/// 더 이상 어떤 `images` 행도 가리키지 않는 URL의 원본만 지웁니다.
/// 커밋 이후에 호출되며, 저장소 오류는 경고 로그로만 남깁니다.
pub async fn delete_unreferenced(pool: &SqlitePool, store: &dyn ObjectStore, urls: &[String]) {
    for url in urls {
        match db::images::count_by_url(pool, url).await {
            Ok(0) => {
                if let Err(e) = delete_by_url(store, url).await {
                    tracing::warn!("Failed to delete image {}: {}", url, e);
                }
            }
            Ok(_) => tracing::debug!("image still referenced, keeping file: {}", url),
            Err(e) => tracing::warn!("Failed to check image references {}: {}", url, e),
        }
    }
}

pub fn object_key(file_name: &str, now: DateTime<Utc>) -> String {
    format!(
        "diglog/{}/{}_{}",
        now.format("%y/%m/%d"),
        uuid::Uuid::now_v7(),
        sanitize_file_name(file_name)
    )
}

// URL에 그대로 쓸 수 있도록 영문/숫자/.-_ 외의 문자는 '_'로 바꿉니다.
fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches(['.', '_']).is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}
