//! # 폴더 서비스
//!
//! ## 일괄 저장 (`save`)
//! 클라이언트는 폴더 트리 전체(또는 일부)를 평탄한 목록으로 보냅니다.
//! 각 항목은 부모를 ID가 아니라 `parentOrderIndex`로 가리키므로,
//! 깊이 0 → 1 → 2 순서로 처리하면서 `order_index → 폴더` 맵으로 부모를 찾습니다.
//!
//! ```text
//! [0] 개발 (depth 0)
//!   [1] Rust (depth 1, parent 0)
//!     [2] axum (depth 2, parent 1)
//! [3] 일상 (depth 0)
//! ```
//!
//! 검증은 쓰기 전에 목록 전체에 대해 한 번 수행하고, 저장은 한 트랜잭션으로 묶습니다.
//! 요청에 없는 기존 폴더는 건드리지 않습니다.
//!
//! ## 일괄 삭제 (`delete`)
//! 함께 삭제되지 않는 하위 폴더나 삭제되지 않은 게시글이 있으면 거부하고,
//! 가장 깊은 폴더부터 지웁니다.

use std::collections::{HashMap, HashSet};

use sqlx::SqlitePool;

use crate::{
    db,
    error::{AppError, ErrorCode},
    models::*,
    services::member,
};

/// 허용되는 깊이 단계 수 (0, 1, 2)
pub const MAX_FOLDER_DEPTH: i64 = 3;
pub const MAX_FOLDER_COUNT: usize = 100;
pub const MAX_ORDER_INDEX: i64 = 99;
pub const MAX_TITLE_LENGTH: usize = 25;

/// 저장 전에 요청 목록 전체를 검증합니다.
pub fn validate_requests(requests: &[FolderCreateRequest]) -> Result<(), ErrorCode> {
    if requests.len() > MAX_FOLDER_COUNT {
        return Err(ErrorCode::FolderOverFlowSize);
    }

    for req in requests {
        if !(0..MAX_FOLDER_DEPTH).contains(&req.depth) {
            return Err(ErrorCode::FolderOverFlowDepth);
        }
        if !(0..=MAX_ORDER_INDEX).contains(&req.order_index) {
            return Err(ErrorCode::FolderOverFlowOrderIndex);
        }
        if req.title.trim().is_empty() {
            return Err(ErrorCode::FolderBlankTitle);
        }
        if req.title.trim().chars().count() > MAX_TITLE_LENGTH {
            return Err(ErrorCode::FolderOverFlowTitleLength);
        }
    }

    let mut order_indexes = HashSet::new();
    if !requests.iter().all(|r| order_indexes.insert(r.order_index)) {
        return Err(ErrorCode::FolderDuplicatedOrderIndex);
    }

    // 같은 부모 아래에서만 제목이 겹치면 안 됩니다. (최상위끼리도 마찬가지)
    let mut titles = HashSet::new();
    for req in requests {
        let parent = if req.depth == 0 {
            None
        } else {
            req.parent_order_index
        };
        if !titles.insert((parent, req.title.trim())) {
            return Err(ErrorCode::FolderDuplicatedTitle);
        }
    }

    Ok(())
}

/// 폴더 목록을 만들거나 수정하고 결과를 `order_index` 순으로 돌려줍니다.
pub async fn save(
    pool: &SqlitePool,
    email: &str,
    requests: &[FolderCreateRequest],
) -> Result<Vec<FolderResponse>, AppError> {
    validate_requests(requests)?;
    let member = member::current_member(pool, email).await?;

    let mut tx = pool.begin().await?;

    let existing: HashMap<String, Folder> = db::folders::find_by_member(&mut *tx, &member.id)
        .await?
        .into_iter()
        .map(|f| (f.id.clone(), f))
        .collect();

    let mut by_order: HashMap<i64, Folder> = HashMap::new();

    for depth in 0..MAX_FOLDER_DEPTH {
        let mut level: Vec<&FolderCreateRequest> =
            requests.iter().filter(|r| r.depth == depth).collect();
        level.sort_by_key(|r| r.order_index);

        for req in level {
            let parent_id = if depth == 0 {
                None
            } else {
                let parent = req
                    .parent_order_index
                    .and_then(|index| by_order.get(&index))
                    .filter(|parent| parent.depth == depth - 1)
                    .ok_or(ErrorCode::FolderParentNotFound)?;
                Some(parent.id.clone())
            };

            let folder = match req.id.as_deref().filter(|id| !id.is_empty()) {
                Some(id) => {
                    if !existing.contains_key(id) {
                        return Err(match db::folders::find_by_id(&mut *tx, id).await? {
                            Some(_) => ErrorCode::FolderMemberMismatch.into(),
                            None => ErrorCode::FolderNotFound.into(),
                        });
                    }
                    let folder = Folder {
                        id: id.to_string(),
                        member_id: member.id.clone(),
                        title: req.title.trim().to_string(),
                        depth,
                        order_index: req.order_index,
                        parent_id,
                    };
                    db::folders::update(&mut *tx, &folder).await?;
                    folder
                }
                None => {
                    let folder = Folder {
                        id: uuid::Uuid::now_v7().to_string(),
                        member_id: member.id.clone(),
                        title: req.title.trim().to_string(),
                        depth,
                        order_index: req.order_index,
                        parent_id,
                    };
                    db::folders::insert(&mut *tx, &folder).await?;
                    folder
                }
            };

            by_order.insert(folder.order_index, folder);
        }
    }

    tx.commit().await?;
    tracing::info!(member_id = %member.id, count = by_order.len(), "folders saved");

    let mut saved: Vec<Folder> = by_order.into_values().collect();
    saved.sort_by_key(|f| f.order_index);
    Ok(saved.into_iter().map(FolderResponse::from).collect())
}

pub async fn delete(
    pool: &SqlitePool,
    email: &str,
    requests: &[FolderDeleteRequest],
) -> Result<(), AppError> {
    let member = member::current_member(pool, email).await?;
    let targets: HashSet<&str> = requests.iter().map(|r| r.folder_id.as_str()).collect();

    let mut tx = pool.begin().await?;

    let mut folders = Vec::with_capacity(targets.len());
    for id in &targets {
        let folder = db::folders::find_by_id(&mut *tx, id)
            .await?
            .ok_or(ErrorCode::FolderNotFound)?;
        if folder.member_id != member.id {
            return Err(ErrorCode::FolderMemberMismatch.into());
        }
        folders.push(folder);
    }

    for folder in &folders {
        let children = db::folders::find_children(&mut *tx, &folder.id).await?;
        if let Some(child) = children.iter().find(|c| !targets.contains(c.id.as_str())) {
            return Err(ErrorCode::FolderHasChild {
                folder: folder.title.clone(),
                child: child.title.clone(),
            }
            .into());
        }

        if let Some(post) = db::posts::find_live_title_in_folder(&mut *tx, &folder.id).await? {
            return Err(ErrorCode::FolderHasPost {
                folder: folder.title.clone(),
                post,
            }
            .into());
        }
    }

    folders.sort_by_key(|f| std::cmp::Reverse(f.depth));
    for folder in &folders {
        db::folders::delete(&mut *tx, &folder.id).await?;
    }

    tx.commit().await?;
    tracing::info!(member_id = %member.id, count = folders.len(), "folders deleted");
    Ok(())
}

/// 회원의 폴더 목록과 폴더별 게시글 수. 없는 회원이면 빈 목록입니다.
pub async fn list_with_post_count(
    pool: &SqlitePool,
    username: &str,
) -> Result<Vec<FolderPostCountResponse>, AppError> {
    let Some(member) = db::members::find_active_by_username(pool, username).await? else {
        return Ok(Vec::new());
    };

    let folders = db::folders::find_with_post_count(pool, &member.id).await?;
    Ok(folders.into_iter().map(FolderPostCountResponse::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(title: &str, depth: i64, order_index: i64, parent: Option<i64>) -> FolderCreateRequest {
        FolderCreateRequest {
            id: None,
            title: title.to_string(),
            depth,
            order_index,
            parent_order_index: parent,
        }
    }

    #[test]
    fn accepts_three_level_tree() {
        let requests = vec![
            req("개발", 0, 0, None),
            req("Rust", 1, 1, Some(0)),
            req("axum", 2, 2, Some(1)),
            req("일상", 0, 3, None),
        ];
        assert!(validate_requests(&requests).is_ok());
    }

    #[test]
    fn rejects_fourth_level() {
        let requests = vec![req("a", 3, 0, Some(0))];
        assert_eq!(validate_requests(&requests), Err(ErrorCode::FolderOverFlowDepth));
    }

    #[test]
    fn rejects_order_index_out_of_range() {
        assert_eq!(
            validate_requests(&[req("a", 0, 100, None)]),
            Err(ErrorCode::FolderOverFlowOrderIndex)
        );
        assert_eq!(
            validate_requests(&[req("a", 0, -1, None)]),
            Err(ErrorCode::FolderOverFlowOrderIndex)
        );
    }

    #[test]
    fn rejects_long_and_blank_titles() {
        let long = "가".repeat(26);
        assert_eq!(
            validate_requests(&[req(&long, 0, 0, None)]),
            Err(ErrorCode::FolderOverFlowTitleLength)
        );
        assert!(validate_requests(&[req(&"가".repeat(25), 0, 0, None)]).is_ok());
        assert_eq!(
            validate_requests(&[req("  ", 0, 0, None)]),
            Err(ErrorCode::FolderBlankTitle)
        );
    }

    #[test]
    fn rejects_more_than_hundred_folders() {
        let requests: Vec<_> = (0..101).map(|i| req(&format!("f{}", i), 0, i % 100, None)).collect();
        assert_eq!(validate_requests(&requests), Err(ErrorCode::FolderOverFlowSize));
    }

    #[test]
    fn rejects_duplicated_order_index() {
        let requests = vec![req("a", 0, 0, None), req("b", 0, 0, None)];
        assert_eq!(
            validate_requests(&requests),
            Err(ErrorCode::FolderDuplicatedOrderIndex)
        );
    }

    #[test]
    fn duplicated_titles_only_matter_under_same_parent() {
        let same_parent = vec![
            req("부모", 0, 0, None),
            req("자식", 1, 1, Some(0)),
            req("자식", 1, 2, Some(0)),
        ];
        assert_eq!(
            validate_requests(&same_parent),
            Err(ErrorCode::FolderDuplicatedTitle)
        );

        let different_parents = vec![
            req("A", 0, 0, None),
            req("B", 0, 1, None),
            req("자식", 1, 2, Some(0)),
            req("자식", 1, 3, Some(1)),
        ];
        assert!(validate_requests(&different_parents).is_ok());
    }
}
