//! 대시보드 갱신 루프.
//!
//! 고정 주기로 메트릭을 조회하고, 추세/파이 차트 옵션을 만들어
//! 마운트된 차트 표면에 통째로 적용한다.
//!
//! 주기는 각자 별도 태스크로 실행되므로 느린 응답이 다음 주기와 겹칠 수 있다.
//! [`CycleSequencer`]는 이미 반영된 주기보다 오래된 데이터가 화면을 덮지 못하게 한다.
//! 조회가 주기보다 오래 걸려도 끝난 결과는 순서대로 반영된다.

use idsdash_core::chart_builder::{build_dashboard, DashboardOptions};
use idsdash_core::config::ChartConfig;
use idsdash_core::error::CoreError;
use idsdash_core::models::status::RefreshStatus;
use idsdash_core::ports::chart_surface::{ChartHost, ChartSurface};
use idsdash_core::ports::metrics_source::MetricsSource;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::sequence::CycleSequencer;
use crate::status::{RefreshStatusTracker, SharedStatusTracker};

/// 기본 폴링 주기 (30초)
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(30_000);

/// 한 주기의 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// 두 차트에 반영됨
    Applied { cycle: u64 },
    /// 더 새로운 주기 `latest`가 이미 반영되어 버림
    Superseded { cycle: u64, latest: u64 },
}

/// 갱신 루프 설정
#[derive(Debug, Clone)]
pub struct RefresherConfig {
    /// 폴링 주기
    pub interval: Duration,
    /// 차트 마운트/스타일
    pub chart: ChartConfig,
    /// stale 전환 임계값 (연속 실패 횟수)
    pub stale_after_failures: u64,
}

impl Default for RefresherConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_REFRESH_INTERVAL,
            chart: ChartConfig::default(),
            stale_after_failures: 3,
        }
    }
}

/// 대시보드 갱신기
pub struct DashboardRefresher {
    config: RefresherConfig,
    source: Arc<dyn MetricsSource>,
    host: Arc<dyn ChartHost>,
    sequencer: CycleSequencer,
    status: SharedStatusTracker,
    /// 마운트별로 한 번 초기화한 표면 (이후 재사용)
    surfaces: Mutex<HashMap<String, Arc<dyn ChartSurface>>>,
}

impl DashboardRefresher {
    /// 새 갱신기 생성
    pub fn new(
        config: RefresherConfig,
        source: Arc<dyn MetricsSource>,
        host: Arc<dyn ChartHost>,
    ) -> Self {
        let status = Arc::new(RefreshStatusTracker::new(config.stale_after_failures));
        Self {
            config,
            source,
            host,
            sequencer: CycleSequencer::new(),
            status,
            surfaces: Mutex::new(HashMap::new()),
        }
    }

    /// 상태 추적기 참조 반환 (웹 API 등 외부 노출용)
    pub fn status_tracker(&self) -> SharedStatusTracker {
        self.status.clone()
    }

    /// 현재 갱신 상태
    pub fn status(&self) -> RefreshStatus {
        self.status.status()
    }

    /// 폴링 주기
    pub fn interval(&self) -> Duration {
        self.config.interval
    }

    /// 한 주기 실행: 조회 → 변환 → 두 차트 교체
    ///
    /// 호출당 네트워크 요청은 최대 한 번. 실패는 상태에 기록한 뒤 반환한다.
    pub async fn refresh(&self) -> Result<RefreshOutcome, CoreError> {
        let cycle = self.sequencer.issue();
        self.status.record_issue(cycle);
        debug!("갱신 주기 #{cycle} 시작");

        let result = self.run_cycle(cycle).await;
        match &result {
            Ok(RefreshOutcome::Applied { cycle }) => {
                self.status.record_success(*cycle);
                debug!("갱신 주기 #{cycle} 반영 완료");
            }
            Ok(RefreshOutcome::Superseded { cycle, latest }) => {
                debug!("갱신 주기 #{cycle} 폐기: 더 새로운 주기 #{latest} 반영됨");
            }
            Err(e) => {
                if e.is_transient() {
                    warn!("갱신 주기 #{cycle} 실패 (일시적): {e}");
                } else {
                    error!("갱신 주기 #{cycle} 실패: {e}");
                }
                self.status.record_failure(e);
            }
        }
        result
    }

    async fn run_cycle(&self, cycle: u64) -> Result<RefreshOutcome, CoreError> {
        let payload = self.source.fetch_metrics().await?;
        let options = build_dashboard(&payload, &self.config.chart);

        match self
            .sequencer
            .apply_if_latest(cycle, || self.apply(&options))
        {
            Some(applied) => applied.map(|()| RefreshOutcome::Applied { cycle }),
            None => Ok(RefreshOutcome::Superseded {
                cycle,
                latest: self.sequencer.latest_applied(),
            }),
        }
    }

    /// 두 차트 옵션 적용 (표면은 최초 1회만 초기화)
    ///
    /// 한쪽 적용이 실패해도 다른 쪽은 적용을 시도해 두 차트가 서로 다른
    /// 주기의 데이터를 보이지 않게 한다. 첫 에러를 반환.
    fn apply(&self, options: &DashboardOptions) -> Result<(), CoreError> {
        let trend = self.surface(&self.config.chart.trend_mount)?;
        let pie = self.surface(&self.config.chart.pie_mount)?;
        let trend_result = trend.set_option(&options.trend);
        let pie_result = pie.set_option(&options.pie);
        trend_result.and(pie_result)
    }

    fn surface(&self, mount: &str) -> Result<Arc<dyn ChartSurface>, CoreError> {
        let mut surfaces = self.surfaces.lock();
        if let Some(surface) = surfaces.get(mount) {
            return Ok(surface.clone());
        }
        let surface = self.host.init(mount)?;
        info!("차트 표면 초기화: {mount}");
        surfaces.insert(mount.to_string(), surface.clone());
        Ok(surface)
    }

    /// 폴링 시작
    ///
    /// 즉시 한 번 갱신한 뒤 `interval`마다 갱신한다. 각 주기는 별도 태스크로
    /// 실행된다. 반환된 핸들로 중지하며, 핸들을 drop해도 루프가 멈춘다.
    pub fn start(self: &Arc<Self>) -> RefreshHandle {
        self.spawn_loop(None)
    }

    /// 폴링 시작 + 라이프사이클 종료 신호 수신 시 자동 중지
    pub fn start_with_shutdown(
        self: &Arc<Self>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> RefreshHandle {
        self.spawn_loop(Some(shutdown_rx))
    }

    fn spawn_loop(
        self: &Arc<Self>,
        mut shutdown_rx: Option<watch::Receiver<bool>>,
    ) -> RefreshHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let refresher = Arc::clone(self);
        let period = self.config.interval;

        info!("대시보드 갱신 시작: 주기={}ms", period.as_millis());

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut inflight = JoinSet::new();

            loop {
                tokio::select! {
                    // 첫 tick은 즉시 완료 → 콜드 스타트
                    _ = interval.tick() => {
                        let r = Arc::clone(&refresher);
                        inflight.spawn(async move {
                            // 실패는 refresh()에서 상태에 기록됨
                            let _ = r.refresh().await;
                        });
                    }
                    Some(joined) = inflight.join_next(), if !inflight.is_empty() => {
                        if let Err(e) = joined {
                            if e.is_panic() {
                                warn!("갱신 태스크 패닉: {e}");
                            }
                        }
                    }
                    _ = stop_rx.changed() => {
                        break;
                    }
                    _ = wait_for_shutdown(&mut shutdown_rx) => {
                        info!("갱신 루프 종료 신호 수신");
                        break;
                    }
                }
            }

            inflight.abort_all();
            info!("대시보드 갱신 중지");
        });

        RefreshHandle {
            stop_tx,
            task,
            status: self.status.clone(),
        }
    }
}

/// 종료 신호 대기 (수신기가 없거나 송신측이 사라지면 영원히 대기)
async fn wait_for_shutdown(shutdown_rx: &mut Option<watch::Receiver<bool>>) {
    if let Some(rx) = shutdown_rx {
        loop {
            if *rx.borrow() {
                return;
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
    }
    std::future::pending::<()>().await
}

/// 실행 중인 폴링 루프 핸들
pub struct RefreshHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
    status: SharedStatusTracker,
}

impl RefreshHandle {
    /// 루프 중지 후 종료 대기 (진행 중인 주기는 취소)
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        if let Err(e) = self.task.await {
            warn!("갱신 루프 종료 대기 실패: {e}");
        }
    }

    /// 루프가 아직 실행 중인지 여부
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// 현재 갱신 상태
    pub fn status(&self) -> RefreshStatus {
        self.status.status()
    }

    /// 상태 변경 수신기
    pub fn subscribe(&self) -> watch::Receiver<RefreshStatus> {
        self.status.subscribe()
    }
}
