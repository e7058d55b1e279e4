//! # 이미지 저장소
//!
//! 이미지 원본은 `ObjectStore` 트레이트 뒤에 저장됩니다.
//! 기본 구현 `LocalStore`는 업로드 디렉토리에 키 경로 그대로 파일을 쓰고,
//! 서버는 이 디렉토리를 `/images` 경로로 정적 서빙합니다.
//!
//! 키 예시: `diglog/25/03/14/<uuid>_photo.png`
//! URL 예시: `{PUBLIC_BASE_URL}/diglog/25/03/14/<uuid>_photo.png`

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use axum::body::Bytes;
use tokio::fs;

use crate::error::{AppError, ErrorCode};

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, data: Bytes) -> Result<(), AppError>;
    /// 없는 키를 지워도 성공입니다.
    async fn delete(&self, key: &str) -> Result<(), AppError>;
    /// 키의 공개 URL
    fn url_for(&self, key: &str) -> String;
    /// 이 저장소가 발급한 URL이면 키를 돌려줍니다.
    fn key_for_url(&self, url: &str) -> Option<String>;
}

/// 로컬 파일시스템 저장소
pub struct LocalStore {
    base_path: PathBuf,
    public_base_url: String,
}

impl LocalStore {
    pub async fn new(base_path: &str, public_base_url: &str) -> Result<Self, AppError> {
        let path = PathBuf::from(base_path);
        fs::create_dir_all(&path).await?;

        Ok(Self {
            base_path: path,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    // 상위 디렉토리(..)나 절대 경로가 섞인 키는 거부합니다.
    fn path_for(&self, key: &str) -> Option<PathBuf> {
        let relative = Path::new(key);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if key.is_empty() || !safe {
            return None;
        }
        Some(self.base_path.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn put(&self, key: &str, data: Bytes) -> Result<(), AppError> {
        let path = self.path_for(key).ok_or(ErrorCode::ImageUploadFailed)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                tracing::error!("Failed to create image directory {:?}: {}", parent, e);
                ErrorCode::ImageUploadFailed
            })?;
        }

        fs::write(&path, &data).await.map_err(|e| {
            tracing::error!("Failed to write image file {:?}: {}", path, e);
            ErrorCode::ImageUploadFailed
        })?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let path = self.path_for(key).ok_or(ErrorCode::ImageDeleteFailed)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                tracing::error!("Failed to delete image file {:?}: {}", path, e);
                Err(ErrorCode::ImageDeleteFailed.into())
            }
        }
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.public_base_url)?
            .strip_prefix('/')
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }
}
