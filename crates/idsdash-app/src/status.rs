//! 갱신 상태 추적.
//!
//! 마지막 성공 시각, 마지막 에러, 연속 실패 횟수를 기록하고
//! 변경될 때마다 `watch` 채널로 브로드캐스트한다.

use chrono::Utc;
use idsdash_core::error::CoreError;
use idsdash_core::models::status::RefreshStatus;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// 갱신 상태 추적기
pub struct RefreshStatusTracker {
    /// 상태 변경 브로드캐스트
    status_tx: watch::Sender<RefreshStatus>,
    /// stale 전환 임계값 (연속 실패 횟수)
    stale_threshold: u64,
}

impl RefreshStatusTracker {
    /// 새 상태 추적기 생성
    ///
    /// `stale_threshold`: 이 횟수만큼 연속 실패하면 stale 전환 (최소 1)
    pub fn new(stale_threshold: u64) -> Self {
        let (status_tx, _) = watch::channel(RefreshStatus::default());
        Self {
            status_tx,
            stale_threshold: stale_threshold.max(1),
        }
    }

    /// 현재 상태 (복제본)
    pub fn status(&self) -> RefreshStatus {
        self.status_tx.borrow().clone()
    }

    /// 상태 변경 수신기 생성
    pub fn subscribe(&self) -> watch::Receiver<RefreshStatus> {
        self.status_tx.subscribe()
    }

    /// 주기 발행 기록
    pub fn record_issue(&self, cycle: u64) {
        self.status_tx.send_modify(|s| s.cycles_issued = s.cycles_issued.max(cycle));
    }

    /// 차트 반영 성공 기록
    ///
    /// 에러/실패 카운터를 초기화하고 stale 상태를 해제한다.
    pub fn record_success(&self, cycle: u64) {
        self.status_tx.send_modify(|s| {
            if s.stale {
                info!("대시보드 데이터 복구됨 (주기 #{cycle})");
            } else if !s.has_rendered() {
                info!("첫 대시보드 렌더링 완료 (주기 #{cycle})");
            }
            s.last_successful_refresh = Some(Utc::now());
            s.last_error = None;
            s.consecutive_failures = 0;
            s.last_applied_cycle = Some(cycle);
            s.stale = false;
        });
    }

    /// 실패 기록
    ///
    /// 임계값 도달 시 stale 전환 (전환 시점에 한 번만 경고).
    pub fn record_failure(&self, error: &CoreError) {
        let threshold = self.stale_threshold;
        self.status_tx.send_modify(|s| {
            s.consecutive_failures += 1;
            s.last_error = Some(error.to_string());
            debug!("갱신 실패 기록 (연속 {}회)", s.consecutive_failures);

            if s.consecutive_failures >= threshold && !s.stale {
                s.stale = true;
                warn!(
                    "연속 {}회 갱신 실패 - 화면 데이터가 오래됨: {error}",
                    s.consecutive_failures
                );
            }
        });
    }
}

impl Default for RefreshStatusTracker {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Arc로 감싼 RefreshStatusTracker
pub type SharedStatusTracker = Arc<RefreshStatusTracker>;
