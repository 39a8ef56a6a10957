//! 차트 옵션 조회 API 핸들러.

use axum::extract::{Path, State};
use axum::Json;
use idsdash_core::error::CoreError;
use idsdash_core::models::chart::ChartOption;
use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::AppState;

/// 적용된 전체 차트 옵션 조회
///
/// GET /api/charts
pub async fn list_charts(State(state): State<AppState>) -> Json<BTreeMap<String, ChartOption>> {
    Json(state.charts.snapshot())
}

/// 마운트별 차트 옵션 조회
///
/// GET /api/charts/{mount}
pub async fn get_chart(
    State(state): State<AppState>,
    Path(mount): Path<String>,
) -> Result<Json<ChartOption>, ApiError> {
    if !state.charts.has_mount(&mount) {
        return Err(CoreError::MountPointNotFound { mount }.into());
    }

    state.charts.current(&mount).map(Json).ok_or_else(|| {
        ApiError::NotFound(format!("차트 {mount}에 아직 적용된 옵션이 없음"))
    })
}
