//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 서비스 계층(services/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `members`: 회원, 권한, 프로필 검색
//! - `refresh`: refresh 토큰 해시 저장소
//! - `verifications`: 이메일 인증 코드
//! - `posts`: 게시글 CRUD, 검색/정렬/페이지 조회
//! - `tags`: 태그와 게시글-태그 관계
//! - `comments`: 댓글 CRUD, 재귀 CTE 깊이 계산
//! - `folders`: 폴더 트리
//! - `images`: 회원/게시글에 연결된 이미지 URL
//!
//! 도메인마다 함수 이름이 겹치므로(`find_by_id` 등) 재공개하지 않고
//! `db::posts::find_by_id`처럼 모듈 경로로 호출합니다.

pub mod comments;
pub mod folders;
pub mod images;
pub mod members;
pub mod posts;
pub mod refresh;
pub mod tags;
pub mod verifications;

/// `LIKE ... ESCAPE '\'`용 부분 일치 패턴. `%`, `_`는 글자 그대로 검색됩니다.
pub fn like_pattern(keyword: &str) -> String {
    let escaped = keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
