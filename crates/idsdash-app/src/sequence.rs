//! 갱신 주기 순서 보장.
//!
//! 주기마다 발행 시점에 단조 증가 번호를 붙인다. 응답이 도착했을 때
//! 더 새로운 주기가 이미 반영되었다면 그 응답은 버린다. 아직 응답이 오지
//! 않은 더 새로운 주기는 판정에 영향을 주지 않으므로, 조회가 주기보다
//! 오래 걸려도 결과는 계속 반영된다.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// 주기 번호 발급기 + 반영 판정기
#[derive(Debug, Default)]
pub struct CycleSequencer {
    /// 마지막으로 발행된 주기 번호 (0 = 아직 없음)
    issued: AtomicU64,
    /// 마지막으로 반영된 주기 번호
    applied: Mutex<u64>,
}

impl CycleSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 새 주기 번호 발행 (1부터 시작)
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// 마지막으로 반영된 주기 번호
    pub fn latest_applied(&self) -> u64 {
        *self.applied.lock()
    }

    /// 주기 `cycle`이 마지막 반영보다 새로우면 `apply`를 실행하고 반영으로 기록한다
    ///
    /// 판정과 `apply`는 같은 잠금 안에서 일어나므로 두 주기의 반영이
    /// 섞이지 않고, 반영된 번호는 줄어들지 않는다. 반영하지 않았으면 `None`.
    pub fn apply_if_latest<T>(&self, cycle: u64, apply: impl FnOnce() -> T) -> Option<T> {
        let mut applied = self.applied.lock();
        if cycle <= *applied {
            return None;
        }
        let result = apply();
        *applied = cycle;
        Some(result)
    }
}
