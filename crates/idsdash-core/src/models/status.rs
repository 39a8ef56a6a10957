//! 대시보드 갱신 상태.
//!
//! 마지막 성공 시각과 마지막 에러를 렌더링 레이어에 노출해
//! 데이터가 오래되었음을 UI가 표시할 수 있게 한다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 폴링 루프의 관측 가능한 상태
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefreshStatus {
    /// 마지막으로 차트에 반영된 성공 시각
    pub last_successful_refresh: Option<DateTime<Utc>>,
    /// 마지막 실패 메시지 (성공 시 초기화)
    pub last_error: Option<String>,
    /// 연속 실패 횟수
    pub consecutive_failures: u64,
    /// 지금까지 발행된 주기 수
    pub cycles_issued: u64,
    /// 마지막으로 차트에 반영된 주기 번호
    pub last_applied_cycle: Option<u64>,
    /// 연속 실패가 임계값에 도달해 화면 데이터가 오래됨
    pub stale: bool,
}

impl RefreshStatus {
    /// 한 번이라도 차트가 그려졌는지 여부
    pub fn has_rendered(&self) -> bool {
        self.last_applied_cycle.is_some()
    }
}
