//! # idsdash-app
//!
//! 대시보드 갱신 오케스트레이션.
//!
//! - [`refresher`] - 폴링 루프, 주기별 조회 → 차트 교체
//! - [`sequence`] - 겹친 주기 중 최신 것만 반영
//! - [`status`] - 마지막 성공/에러, stale 판정
//! - [`lifecycle`] - 종료 신호

pub mod lifecycle;
pub mod refresher;
pub mod sequence;
pub mod status;

pub use refresher::{DashboardRefresher, RefreshHandle, RefreshOutcome, RefresherConfig};
