//! 갱신 상태 API 핸들러.

use axum::extract::State;
use axum::Json;
use idsdash_core::models::status::RefreshStatus;

use crate::AppState;

/// 갱신 상태 조회 (마지막 성공 시각, 마지막 에러, stale 여부)
///
/// GET /api/status
pub async fn get_status(State(state): State<AppState>) -> Json<RefreshStatus> {
    Json(state.status_rx.borrow().clone())
}
