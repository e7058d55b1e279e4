//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 이 모듈의 핵심:
//! - `ErrorCode` 열거형: 도메인 에러 코드. 각 코드는 HTTP 상태와 한국어 메시지를 가집니다.
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//!
//! 응답 본문 형태: `{ "error": { "code": "POST_NOT_FOUND", "message": "..." } }`

use axum::{
    http::StatusCode,                   // HTTP 상태 코드 (200, 404, 500 등)
    response::{IntoResponse, Response}, // Axum의 응답 변환 트레이트
    Json,                               // JSON 응답 래퍼
};
use serde_json::json;
use thiserror::Error;

/// 도메인 에러 코드
///
/// `#[error("...")]`가 곧 클라이언트에 내려가는 메시지입니다.
/// 코드 문자열은 `code()`, HTTP 상태는 `status()`로 얻습니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorCode {
    // ── 회원 ──
    #[error("이메일 또는 비밀번호가 일치하지 않습니다.")]
    LoginFailed,
    #[error("이미 가입된 회원입니다.")]
    SignupMemberExists,
    #[error("다른 방법으로 회원가입 되어있습니다. 다른 로그인 방법으로 시도해주세요.")]
    SignupPlatformDuplicated,
    #[error("메일 발송 중 오류가 발생하였습니다.")]
    SignupMailSendFailed,
    #[error("해당 이메일에 대한 인증 코드가 없습니다.")]
    SignupCodeNotExists,
    #[error("인증되지 않은 코드입니다.")]
    SignupCodeNotVerified,
    #[error("인증 코드가 일치하지 않습니다.")]
    SignupCodeNotMatched,
    #[error("코드 유효기간이 만료되었습니다.")]
    SignupCodeExpired,
    #[error("해당 이메일을 가진 회원이 없습니다.")]
    MemberEmailNotFound,
    #[error("해당 사용자 이름을 가진 회원이 없습니다.")]
    MemberUsernameNotFound,
    #[error("이미 사용 중인 사용자 이름입니다.")]
    MemberUsernameDuplicated,

    // ── 게시글 ──
    #[error("게시글을 찾을 수 없습니다.")]
    PostNotFound,
    #[error("게시글에 대한 권한이 없습니다.")]
    PostNoPermission,
    #[error("게시글 삭제에 실패했습니다.")]
    PostDeleteFailed,
    #[error("지원하지 않는 정렬 기준입니다.")]
    PostInvalidSort,
    #[error("지원하지 않는 검색 옵션입니다.")]
    PostInvalidSearchOption,

    // ── 댓글 ──
    #[error("부모 댓글을 찾을 수 없습니다.")]
    CommentParentIdNotFound,
    #[error("댓글의 최대 깊이를 초과했습니다.")]
    CommentMaxDepthExceeded,
    #[error("댓글을 찾을 수 없습니다.")]
    CommentNotFound,
    #[error("댓글에 대한 권한이 없습니다.")]
    CommentNoPermission,
    #[error("이미 삭제된 댓글이거나 변경할 수 없는 댓글입니다.")]
    CommentIsDeletedNoChange,

    // ── 폴더 ──
    #[error("최대 폴더의 개수(100개)를 초과했습니다.")]
    FolderOverFlowSize,
    #[error("하위 폴더의 깊이는 3까지 허용됩니다.")]
    FolderOverFlowDepth,
    #[error("최대 폴더 순서(100번)를 초과했습니다.")]
    FolderOverFlowOrderIndex,
    #[error("폴더 제목은 25자 까지만 허용됩니다.")]
    FolderOverFlowTitleLength,
    #[error("폴더 제목을 입력해주세요.")]
    FolderBlankTitle,
    #[error("중복된 폴더 이름이 존재합니다.")]
    FolderDuplicatedTitle,
    #[error("중복된 폴더 순서가 존재합니다.")]
    FolderDuplicatedOrderIndex,
    #[error("로그인 중인 회원 정보와 폴더 회원 정보가 일치하지 않습니다.")]
    FolderMemberMismatch,
    #[error("폴더를 찾을 수 없습니다.")]
    FolderNotFound,
    #[error("상위 폴더를 찾을 수 없습니다.")]
    FolderParentNotFound,
    #[error("\"{folder}\" 폴더 하위에 \"{child}\" 폴더가 존재합니다. 먼저 삭제해주세요")]
    FolderHasChild { folder: String, child: String },
    #[error("\"{folder}\" 폴더 하위에 \"{post}\" 게시글이 존재합니다. 먼저 삭제해주세요")]
    FolderHasPost { folder: String, post: String },

    // ── 이미지 ──
    #[error("이미지 파일만 업로드할 수 있습니다.")]
    ImageWrongFile,
    #[error("이미지 업로드에 실패했습니다.")]
    ImageUploadFailed,
    #[error("이미지 삭제에 실패했습니다.")]
    ImageDeleteFailed,
}

impl ErrorCode {
    /// 응답 본문의 `code` 값 (SCREAMING_SNAKE_CASE)
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::LoginFailed => "LOGIN_FAILED",
            ErrorCode::SignupMemberExists => "SIGNUP_MEMBER_EXISTS",
            ErrorCode::SignupPlatformDuplicated => "SIGNUP_PLATFORM_DUPLICATED",
            ErrorCode::SignupMailSendFailed => "SIGNUP_MAIL_SEND_FAILED",
            ErrorCode::SignupCodeNotExists => "SIGNUP_CODE_NOT_EXISTS",
            ErrorCode::SignupCodeNotVerified => "SIGNUP_CODE_NOT_VERIFIED",
            ErrorCode::SignupCodeNotMatched => "SIGNUP_CODE_NOT_MATCHED",
            ErrorCode::SignupCodeExpired => "SIGNUP_CODE_EXPIRED",
            ErrorCode::MemberEmailNotFound => "MEMBER_EMAIL_NOT_FOUND",
            ErrorCode::MemberUsernameNotFound => "MEMBER_USERNAME_NOT_FOUND",
            ErrorCode::MemberUsernameDuplicated => "MEMBER_USERNAME_DUPLICATED",
            ErrorCode::PostNotFound => "POST_NOT_FOUND",
            ErrorCode::PostNoPermission => "POST_NO_PERMISSION",
            ErrorCode::PostDeleteFailed => "POST_DELETE_FAILED",
            ErrorCode::PostInvalidSort => "POST_INVALID_SORT",
            ErrorCode::PostInvalidSearchOption => "POST_INVALID_SEARCH_OPTION",
            ErrorCode::CommentParentIdNotFound => "COMMENT_PARENT_ID_NOT_FOUND",
            ErrorCode::CommentMaxDepthExceeded => "COMMENT_MAX_DEPTH_EXCEEDED",
            ErrorCode::CommentNotFound => "COMMENT_NOT_FOUND",
            ErrorCode::CommentNoPermission => "COMMENT_NO_PERMISSION",
            ErrorCode::CommentIsDeletedNoChange => "COMMENT_IS_DELETED_NO_CHANGE",
            ErrorCode::FolderOverFlowSize => "FOLDER_OVER_FLOW_SIZE",
            ErrorCode::FolderOverFlowDepth => "FOLDER_OVER_FLOW_DEPTH",
            ErrorCode::FolderOverFlowOrderIndex => "FOLDER_OVER_FLOW_ORDER_INDEX",
            ErrorCode::FolderOverFlowTitleLength => "FOLDER_OVER_FLOW_TITLE_LENGTH",
            ErrorCode::FolderBlankTitle => "FOLDER_BLANK_TITLE",
            ErrorCode::FolderDuplicatedTitle => "FOLDER_DUPLICATED_TITLE",
            ErrorCode::FolderDuplicatedOrderIndex => "FOLDER_DUPLICATED_ORDER_INDEX",
            ErrorCode::FolderMemberMismatch => "FOLDER_MEMBER_MISMATCH",
            ErrorCode::FolderNotFound => "FOLDER_NOT_FOUND",
            ErrorCode::FolderParentNotFound => "FOLDER_PARENT_NOT_FOUND",
            ErrorCode::FolderHasChild { .. } => "FOLDER_HAS_CHILD",
            ErrorCode::FolderHasPost { .. } => "FOLDER_HAS_POST",
            ErrorCode::ImageWrongFile => "IMAGE_WRONG_FILE",
            ErrorCode::ImageUploadFailed => "IMAGE_UPLOAD_FAILED",
            ErrorCode::ImageDeleteFailed => "IMAGE_DELETE_FAILED",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::SignupMemberExists
            | ErrorCode::SignupPlatformDuplicated
            | ErrorCode::MemberUsernameDuplicated => StatusCode::CONFLICT,

            ErrorCode::SignupMailSendFailed
            | ErrorCode::ImageUploadFailed
            | ErrorCode::ImageDeleteFailed => StatusCode::INTERNAL_SERVER_ERROR,

            ErrorCode::PostNotFound | ErrorCode::CommentNotFound | ErrorCode::FolderNotFound => {
                StatusCode::NOT_FOUND
            }

            ErrorCode::PostNoPermission
            | ErrorCode::CommentNoPermission
            | ErrorCode::FolderMemberMismatch => StatusCode::FORBIDDEN,

            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 각 에러 variant는 적절한 HTTP 상태 코드와 메시지로 변환됩니다.
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청 값 검증 실패 (HTTP 400)
    /// 응답 코드는 `VALIDATION_<FIELD>` 형태가 됩니다. (예: `VALIDATION_EMAIL`)
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    /// 도메인 에러 코드 (상태/메시지는 `ErrorCode`가 결정)
    /// #[from]: `ErrorCode`에 `?`를 쓰면 자동으로 이 variant로 변환됩니다.
    #[error(transparent)]
    Code(#[from] ErrorCode),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 파일 입출력 오류 (HTTP 500)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, IO, Internal)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Validation { field, ref message } => (
                StatusCode::BAD_REQUEST,
                format!("VALIDATION_{}", field.to_uppercase()),
                message.clone(),
            ),
            AppError::Code(ref code) => (code.status(), code.code().to_string(), code.to_string()),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error".to_string(),
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error".to_string(),
                    "A database error occurred".to_string(),
                )
            }
            AppError::Io(ref e) => {
                tracing::error!("IO error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "io_error".to_string(),
                    "An IO error occurred".to_string(),
                )
            }
        };

        // 결과: { "error": { "code": "POST_NOT_FOUND", "message": "게시글을 찾을 수 없습니다." } }
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
