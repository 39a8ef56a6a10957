//! API 라우트 정의.

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::AppState;

/// API 라우트 생성
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // 차트 옵션
        .route("/charts", get(handlers::charts::list_charts))
        .route("/charts/{mount}", get(handlers::charts::get_chart))
        // 갱신 상태
        .route("/status", get(handlers::status::get_status))
}
