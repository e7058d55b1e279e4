//! # 데이터 모델 모듈
//!
//! DB 행(row)에 대응하는 구조체와 요청/응답 DTO를 정의합니다.
//! - `member`: 회원, 가입 경로, 로그인/프로필 DTO
//! - `verification`: 이메일 인증 코드
//! - `post`: 게시글과 검색/목록 쿼리
//! - `comment`: 댓글(트리)
//! - `folder`: 폴더(트리)
//! - `tag`, `image`: 태그, 이미지 URL
//! - `page`: 목록 응답 공통 페이지 구조
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Post`처럼 짧게 접근합니다.
//! 요청/응답 JSON 필드명은 camelCase입니다.

pub mod comment;
pub mod folder;
pub mod image;
pub mod member;
pub mod page;
pub mod post;
pub mod tag;
pub mod verification;

pub use comment::*;
pub use folder::*;
pub use image::*;
pub use member::*;
pub use page::*;
pub use post::*;
pub use tag::*;
pub use verification::*;
