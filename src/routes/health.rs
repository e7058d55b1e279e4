//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /api/health` → `{ "status": "ok" }` (인증 없음)
//! - `GET /actuator/health` → `{ "status": "UP", "database": "UP" | "DOWN" }` (Basic 인증)
//!
//! 로드밸런서는 `/api/health`를, 운영 모니터링은 `/actuator/health`를 사용합니다.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{middleware::auth::AdminUser, routes::AppState};

/// 고정된 JSON만 반환하므로 실패하지 않습니다.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok"
    }))
}

/// DB에 `SELECT 1`을 보내 연결 상태까지 확인합니다.
pub async fn actuator_health(_admin: AdminUser, State(state): State<AppState>) -> Json<Value> {
    let database = match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => "UP",
        Err(e) => {
            tracing::warn!("Database health check failed: {}", e);
            "DOWN"
        }
    };

    Json(json!({
        "status": "UP",
        "database": database
    }))
}
