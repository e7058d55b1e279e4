//! # 서비스 계층
//!
//! 라우트 핸들러와 DB 쿼리 사이에서 비즈니스 규칙을 담당합니다.
//! 여러 쓰기 작업이 함께 성공해야 하는 경우 여기서 트랜잭션을 엽니다.

pub mod auth;
pub mod comment;
pub mod folder;
pub mod image;
pub mod kakao;
pub mod mail;
pub mod member;
pub mod post;
pub mod storage;
pub mod tag;
pub mod verification;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::AppError;

/// DB에 저장된 `2025-01-02T03:04:05.678Z` 형식의 시각을 읽습니다.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, AppError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.3fZ")
        .map(|naive| naive.and_utc())
        .map_err(|e| AppError::Internal(format!("Date parse error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_sqlite_timestamps() {
        let ts = parse_timestamp("2025-03-14T09:26:53.589Z").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2025, 3, 14));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (9, 26, 53));
        assert!(parse_timestamp("yesterday").is_err());
    }
}
