//! # 게시글 서비스
//!
//! 작성/수정은 게시글, 태그, 이미지 레코드를 한 트랜잭션으로 저장합니다.
//! 수정 시 본문에서 빠진 이미지는 트랜잭션 커밋 후 저장소에서도 지웁니다.

use std::collections::{HashMap, HashSet};

use sqlx::{SqliteConnection, SqlitePool};

use crate::{
    db::{self, posts::PostFilter},
    error::{AppError, ErrorCode},
    models::*,
    routes::AppState,
    services::{image, member, tag},
};

/// `sorts` 쿼리 값을 정렬 기준으로 바꿉니다.
///
/// `sorts=createdAt&sorts=title`과 `sorts=createdAt,title` 모두 허용합니다.
/// 비어 있으면 작성일 기준입니다.
pub fn parse_sorts(values: &[String]) -> Result<Vec<PostSort>, AppError> {
    let mut sorts = Vec::new();
    for value in values.iter().flat_map(|v| v.split(',')) {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let sort = PostSort::parse(value).ok_or(ErrorCode::PostInvalidSort)?;
        if !sorts.contains(&sort) {
            sorts.push(sort);
        }
    }
    if sorts.is_empty() {
        sorts.push(PostSort::CreatedAt);
    }
    Ok(sorts)
}

fn validate_content(title: &str, content: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::validation("title", "제목을 입력해주세요."));
    }
    if content.trim().is_empty() {
        return Err(AppError::validation("content", "내용을 입력해주세요."));
    }
    Ok(())
}

/// 폴더가 지정되었다면 회원 본인의 폴더인지 확인합니다.
async fn check_folder(
    conn: &mut SqliteConnection,
    folder_id: Option<&str>,
    member_id: &str,
) -> Result<(), AppError> {
    let Some(folder_id) = folder_id else {
        return Ok(());
    };
    let folder = db::folders::find_by_id(&mut *conn, folder_id)
        .await?
        .ok_or(ErrorCode::FolderNotFound)?;
    if folder.member_id != member_id {
        return Err(ErrorCode::FolderMemberMismatch.into());
    }
    Ok(())
}

async fn save_tags(
    conn: &mut SqliteConnection,
    post_id: &str,
    tag_names: &[String],
) -> Result<(), AppError> {
    let names = tag::normalize_names(tag_names);
    let tags = db::tags::save_all(&mut *conn, &names).await?;
    let tag_ids: Vec<String> = tags.into_iter().map(|t| t.id).collect();
    db::tags::replace_post_tags(conn, post_id, &tag_ids).await
}

fn dedupe_urls(urls: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.iter()
        .map(|u| u.trim())
        .filter(|u| !u.is_empty() && seen.insert(u.to_string()))
        .map(str::to_string)
        .collect()
}

// 다른 회원의 프로필이나 게시글이 가진 URL은 이 게시글의 이미지로 기록하지 않습니다.
async fn record_image(conn: &mut SqliteConnection, post_id: &str, url: &str) -> Result<(), AppError> {
    if db::images::is_held_by_other(&mut *conn, url, post_id).await? {
        tracing::debug!(post_id = %post_id, "skipping image owned elsewhere: {}", url);
        return Ok(());
    }
    db::images::insert(&mut *conn, post_id, url).await
}

pub async fn create(state: &AppState, email: &str, req: &PostRequest) -> Result<String, AppError> {
    validate_content(&req.title, &req.content)?;
    let member = member::current_member(&state.pool, email).await?;
    let folder_id = req.folder_id.as_deref();

    let mut tx = state.pool.begin().await?;
    check_folder(&mut tx, folder_id, &member.id).await?;
    let post_id = db::posts::insert(&mut tx, &member.id, folder_id, &req.title, &req.content).await?;
    save_tags(&mut tx, &post_id, &req.tag_names).await?;
    for url in dedupe_urls(&req.urls) {
        record_image(&mut tx, &post_id, &url).await?;
    }
    tx.commit().await?;

    tracing::info!(post_id = %post_id, member_id = %member.id, "post created");
    Ok(post_id)
}

pub async fn update(state: &AppState, email: &str, req: &PostUpdateRequest) -> Result<(), AppError> {
    validate_content(&req.title, &req.content)?;
    let member = member::current_member(&state.pool, email).await?;
    let post = db::posts::find_by_id(&state.pool, &req.id)
        .await?
        .filter(|p| !p.is_deleted)
        .ok_or(ErrorCode::PostNotFound)?;
    if post.member_id != member.id {
        return Err(ErrorCode::PostNoPermission.into());
    }
    let folder_id = req.folder_id.as_deref();

    let new_urls = dedupe_urls(&req.urls);
    let old_urls = db::images::find_urls_by_ref(&state.pool, &post.id).await?;
    let removed: Vec<String> = old_urls
        .iter()
        .filter(|u| !new_urls.contains(u))
        .cloned()
        .collect();

    let mut tx = state.pool.begin().await?;
    check_folder(&mut tx, folder_id, &member.id).await?;
    db::posts::update(&mut tx, &post.id, folder_id, &req.title, &req.content).await?;
    save_tags(&mut tx, &post.id, &req.tag_names).await?;
    for url in &removed {
        db::images::delete_by_ref_and_url(&mut *tx, &post.id, url).await?;
    }
    for url in new_urls.iter().filter(|u| !old_urls.contains(u)) {
        record_image(&mut tx, &post.id, url).await?;
    }
    tx.commit().await?;

    image::delete_unreferenced(&state.pool, state.store.as_ref(), &removed).await;

    Ok(())
}

/// 여러 게시글을 한 폴더로 옮깁니다. (`folder_id`가 `None`이면 폴더 해제)
pub async fn move_to_folder(
    state: &AppState,
    email: &str,
    req: &PostFolderUpdateRequest,
) -> Result<(), AppError> {
    let member = member::current_member(&state.pool, email).await?;
    let folder_id = req.folder_id.as_deref();

    let mut tx = state.pool.begin().await?;
    check_folder(&mut tx, folder_id, &member.id).await?;
    for post_id in &req.post_ids {
        let post = db::posts::find_by_id(&mut *tx, post_id)
            .await?
            .filter(|p| !p.is_deleted)
            .ok_or(ErrorCode::PostNotFound)?;
        if post.member_id != member.id {
            return Err(ErrorCode::PostNoPermission.into());
        }
        db::posts::update_folder(&mut tx, post_id, folder_id).await?;
    }
    tx.commit().await?;

    Ok(())
}

pub async fn get(pool: &SqlitePool, id: &str) -> Result<PostResponse, AppError> {
    let view = db::posts::find_view(pool, id)
        .await?
        .ok_or(ErrorCode::PostNotFound)?;
    let mut responses = to_responses(pool, vec![view]).await?;
    responses.pop().ok_or(ErrorCode::PostNotFound.into())
}

pub async fn list(pool: &SqlitePool, query: &PostListQuery) -> Result<Page<PostResponse>, AppError> {
    let sorts = parse_sorts(&query.sorts)?;
    let page = PageRequest::new(query.page, query.size);
    let descending = query.is_descending.unwrap_or(true);

    find_page(pool, &PostFilter::All, &sorts, descending, page).await
}

pub async fn search(
    pool: &SqlitePool,
    query: &PostSearchQuery,
) -> Result<Page<PostResponse>, AppError> {
    let option = SearchOption::parse(&query.option).ok_or(ErrorCode::PostInvalidSearchOption)?;
    let sorts = parse_sorts(&query.sorts)?;
    let page = PageRequest::new(query.page, query.size);
    let descending = query.is_descending.unwrap_or(true);
    let keyword = query.keyword.trim();
    let filter = PostFilter::Search { keyword, option };

    find_page(pool, &filter, &sorts, descending, page).await
}

/// 회원의 게시글 (폴더 지정 시 해당 폴더들만), 최신순
pub async fn member_posts(
    pool: &SqlitePool,
    query: &MemberPostsQuery,
) -> Result<Page<PostResponse>, AppError> {
    let member = db::members::find_active_by_username(pool, &query.username)
        .await?
        .ok_or(ErrorCode::MemberUsernameNotFound)?;
    let page = PageRequest::new(query.page, query.size);
    let filter = PostFilter::Member {
        member_id: &member.id,
        folder_ids: &query.folder_ids,
    };

    find_page(pool, &filter, &[PostSort::CreatedAt], true, page).await
}

/// 회원의 게시글 중 태그가 달린 것. 없는 회원이나 태그면 빈 페이지입니다.
pub async fn member_tag_posts(
    pool: &SqlitePool,
    query: &MemberTagPostsQuery,
) -> Result<Page<PostResponse>, AppError> {
    let page = PageRequest::new(query.page, query.size);
    let Some(member) = db::members::find_active_by_username(pool, &query.username).await? else {
        return Ok(Page::empty(page));
    };
    let tag_id = query.tag_id.as_deref().filter(|t| !t.is_empty());
    if let Some(tag_id) = tag_id {
        if !db::tags::exists(pool, tag_id).await? {
            return Ok(Page::empty(page));
        }
    }
    let filter = PostFilter::MemberTag {
        member_id: &member.id,
        tag_id,
    };

    find_page(pool, &filter, &[PostSort::CreatedAt], true, page).await
}

pub async fn delete(pool: &SqlitePool, email: &str, id: &str) -> Result<(), AppError> {
    let member = member::current_member(pool, email).await?;
    if !db::posts::soft_delete(pool, id, &member.id).await? {
        return Err(ErrorCode::PostDeleteFailed.into());
    }
    tracing::info!(post_id = %id, "post deleted");
    Ok(())
}

async fn find_page(
    pool: &SqlitePool,
    filter: &PostFilter<'_>,
    sorts: &[PostSort],
    descending: bool,
    page: PageRequest,
) -> Result<Page<PostResponse>, AppError> {
    let (views, total) = db::posts::find_page(pool, filter, sorts, descending, page).await?;
    let content = to_responses(pool, views).await?;
    Ok(Page::new(content, page, total))
}

/// 태그를 한 번에 조회해 게시글별로 붙입니다.
async fn to_responses(
    pool: &SqlitePool,
    views: Vec<PostView>,
) -> Result<Vec<PostResponse>, AppError> {
    let ids: Vec<String> = views.iter().map(|v| v.id.clone()).collect();
    let mut tags_by_post: HashMap<String, Vec<TagResponse>> = HashMap::new();
    for row in db::tags::find_by_post_ids(pool, &ids).await? {
        tags_by_post.entry(row.post_id).or_default().push(TagResponse {
            id: row.id,
            name: row.name,
        });
    }

    Ok(views
        .into_iter()
        .map(|view| {
            let tags = tags_by_post.remove(&view.id).unwrap_or_default();
            PostResponse::new(view, tags)
        })
        .collect())
}
