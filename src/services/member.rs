//! # 회원 서비스
//!
//! 로그인한 회원 조회, 이름 변경, 프로필 조회/검색, 프로필 이미지 교체를 담당합니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sqlx::{SqliteConnection, SqlitePool};

use crate::{
    db,
    error::{AppError, ErrorCode},
    models::*,
    routes::AppState,
    services::image::{self, ImageUpload},
};

/// 토큰의 이메일로 현재 회원을 찾습니다. 탈퇴한 회원은 없는 것으로 취급합니다.
pub async fn current_member(pool: &SqlitePool, email: &str) -> Result<Member, AppError> {
    db::members::find_by_email(pool, email)
        .await?
        .filter(|m| !m.is_deleted)
        .ok_or(ErrorCode::MemberEmailNotFound.into())
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| AppError::Internal(format!("Password hash parse error: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// `base`가 사용 중이면 `base_1a2b`처럼 UUID 4자리를 붙여 빈 이름을 찾습니다.
pub async fn unique_username(conn: &mut SqliteConnection, base: &str) -> Result<String, AppError> {
    let base = base.trim();
    let base = if base.is_empty() { "user" } else { base };

    if !db::members::username_exists(&mut *conn, base).await? {
        return Ok(base.to_string());
    }

    loop {
        let uuid = uuid::Uuid::now_v7().simple().to_string();
        let candidate = format!("{}_{}", base, &uuid[uuid.len() - 4..]);
        if !db::members::username_exists(&mut *conn, &candidate).await? {
            return Ok(candidate);
        }
    }
}

pub async fn rename(pool: &SqlitePool, email: &str, username: &str) -> Result<(), AppError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::validation("username", "사용자 이름을 입력해주세요."));
    }

    let member = current_member(pool, email).await?;
    if member.username == username {
        return Ok(());
    }
    if db::members::username_exists(pool, username).await? {
        return Err(ErrorCode::MemberUsernameDuplicated.into());
    }

    db::members::update_username(pool, &member.id, username).await?;
    tracing::info!(member_id = %member.id, "username changed");
    Ok(())
}

pub async fn profile(pool: &SqlitePool, email: &str) -> Result<MemberProfileResponse, AppError> {
    let member = current_member(pool, email).await?;
    let profile_url = db::members::find_profile_url(pool, &member.id).await?;

    Ok(MemberProfileResponse {
        email: member.email,
        username: member.username,
        profile_url,
    })
}

pub async fn public_profile(
    pool: &SqlitePool,
    username: &str,
) -> Result<MemberProfileInfoResponse, AppError> {
    let member = db::members::find_active_by_username(pool, username)
        .await?
        .ok_or(ErrorCode::MemberUsernameNotFound)?;
    let profile_url = db::members::find_profile_url(pool, &member.id).await?;

    Ok(MemberProfileInfoResponse {
        username: member.username,
        profile_url,
    })
}

pub async fn search(
    pool: &SqlitePool,
    keyword: &str,
    page: PageRequest,
) -> Result<Page<MemberProfileInfoResponse>, AppError> {
    let (content, total) =
        db::members::search_by_username(pool, keyword.trim(), page.size, page.offset()).await?;
    Ok(Page::new(content, page, total))
}

/// 새 프로필 이미지를 올리고 이전 이미지(레코드와 원본)를 지웁니다.
pub async fn update_profile_image(
    state: &AppState,
    email: &str,
    upload: ImageUpload,
) -> Result<String, AppError> {
    let member = current_member(&state.pool, email).await?;
    let url = image::upload(state.store.as_ref(), upload).await?;
    let old_urls = db::images::find_urls_by_ref(&state.pool, &member.id).await?;

    let mut tx = state.pool.begin().await?;
    db::images::delete_by_ref(&mut *tx, &member.id).await?;
    db::images::insert(&mut *tx, &member.id, &url).await?;
    tx.commit().await?;

    image::delete_unreferenced(&state.pool, state.store.as_ref(), &old_urls).await;

    Ok(url)
}
