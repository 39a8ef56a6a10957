//! # idsdash
//!
//! IDS 대시보드 차트 갱신기 바이너리 진입점.
//! 설정 로드, 어댑터 와이어링, 갱신 루프/조회 API 실행, 종료 처리.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use idsdash_app::lifecycle::LifecycleManager;
use idsdash_app::{DashboardRefresher, RefreshOutcome, RefresherConfig};
use idsdash_core::config::AppConfig;
use idsdash_core::config_manager::ConfigManager;
use idsdash_core::ports::chart_surface::ChartHost;
use idsdash_network::http_client::HttpMetricsClient;
use idsdash_render::{FanOutChartHost, JsonFileChartHost, MemoryChartHost};
use idsdash_web::WebServer;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// IDS 대시보드 차트 갱신기
///
/// 백엔드 집계 API를 주기적으로 조회해 추세/유형 분포 차트를 갱신한다
#[derive(Parser, Debug)]
#[command(name = "idsdash")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// IDS 백엔드 URL (기본: http://localhost:5000)
    #[arg(long, short = 's')]
    server: Option<String>,

    /// 갱신 주기 (밀리초)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// 차트 옵션 JSON 출력 디렉토리 (`<dir>/<mount>.json`)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리)
    #[arg(long)]
    config: Option<PathBuf>,

    /// 한 번만 갱신하고 종료 (실패 시 0이 아닌 종료 코드)
    #[arg(long)]
    once: bool,

    /// 로컬 조회 API 비활성화
    #[arg(long)]
    no_web: bool,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,
}

/// 설정 로드 (파일이 없으면 기본 설정 생성)
///
/// 설정 관리자를 만들 수 없으면 기본 설정으로 계속 진행한다.
fn load_config(path: Option<PathBuf>) -> Result<AppConfig> {
    let manager = match path {
        Some(path) => Some(
            ConfigManager::with_path(path).context("지정된 설정 파일을 불러올 수 없음")?,
        ),
        None => match ConfigManager::new() {
            Ok(manager) => Some(manager),
            Err(e) => {
                warn!("설정 관리자 초기화 실패, 기본 설정 사용: {e}");
                None
            }
        },
    };

    Ok(match manager {
        Some(manager) => {
            info!("설정 파일: {}", manager.config_path().display());
            manager.get()
        }
        None => AppConfig::default_config(),
    })
}

/// CLI 인자로 설정 오버라이드
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(ref server_url) = args.server {
        config.server.base_url = server_url.clone();
    }
    if let Some(interval_ms) = args.interval_ms {
        config.refresh.interval_ms = interval_ms;
    }
    if let Some(ref dir) = args.output_dir {
        config.output.output_dir = Some(dir.clone());
    }
    if args.no_web {
        config.web.enabled = false;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "idsdash={},idsdash_app={},idsdash_core={},idsdash_network={},idsdash_render={},idsdash_web={},tower_http=warn",
        args.log_level, args.log_level, args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    info!("idsdash 시작");

    let mut config = load_config(args.config.clone())?;
    apply_overrides(&mut config, &args);
    config
        .validate()
        .map_err(|e| anyhow!("설정 검증 실패: {e}"))?;

    // ── 어댑터 생성 (DI 와이어링) ──

    // 1. 메트릭 소스
    let source = Arc::new(HttpMetricsClient::new(
        &config.server.base_url,
        &config.server.chart_path,
        config.request_timeout(),
    )?);
    info!("메트릭 엔드포인트: {}", source.endpoint());

    // 2. 차트 호스트 (인메모리 + 선택적 파일 출력)
    let mounts = [
        config.chart.trend_mount.clone(),
        config.chart.pie_mount.clone(),
    ];
    let memory_host = Arc::new(MemoryChartHost::new(mounts));
    let host: Arc<dyn ChartHost> = match config.output.output_dir {
        Some(ref dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("출력 디렉토리 생성 실패: {}", dir.display()))?;
            info!("차트 옵션 파일 출력: {}", dir.display());
            Arc::new(
                FanOutChartHost::new()
                    .with_host(memory_host.clone())
                    .with_host(Arc::new(JsonFileChartHost::new(dir.clone()))),
            ) as Arc<dyn ChartHost>
        }
        None => memory_host.clone() as Arc<dyn ChartHost>,
    };

    // 3. 갱신기
    let refresher = Arc::new(DashboardRefresher::new(
        RefresherConfig {
            interval: config.refresh_interval(),
            chart: config.chart.clone(),
            stale_after_failures: config.refresh.stale_after_failures,
        },
        source,
        host,
    ));

    // 단발 실행
    if args.once {
        return match refresher.refresh().await {
            Ok(RefreshOutcome::Applied { cycle }) => {
                info!("갱신 완료 (주기 #{cycle})");
                Ok(())
            }
            Ok(RefreshOutcome::Superseded { cycle, latest }) => Err(anyhow!(
                "갱신 주기 #{cycle}이 #{latest}에 의해 폐기됨"
            )),
            Err(e) => Err(anyhow!("갱신 실패: {e}")),
        };
    }

    // 4. 라이프사이클
    let lifecycle = Arc::new(LifecycleManager::new());

    // ── 태스크 시작 ──

    let handle = refresher.start_with_shutdown(lifecycle.subscribe());

    if config.web.enabled {
        let web_server =
            WebServer::new(memory_host.clone(), handle.subscribe(), config.web.clone());
        let web_shutdown_rx = lifecycle.subscribe();
        match web_server.bind().await {
            Ok(listener) => {
                match listener.local_addr() {
                    Ok(addr) => info!("조회 API: http://{addr}/api/charts"),
                    Err(e) => warn!("조회 API 주소 확인 실패: {e}"),
                }
                tokio::spawn(async move {
                    if let Err(e) = web_server.serve(listener, web_shutdown_rx).await {
                        error!("웹 서버 오류: {e}");
                    }
                });
            }
            Err(e) => error!("조회 API 바인드 실패, 갱신만 계속: {e}"),
        }
    }

    info!(
        "idsdash 실행 중 (Ctrl+C로 종료), 주기={}ms",
        config.refresh.interval_ms
    );

    // OS 시그널 대기
    if let Err(e) = lifecycle.wait_for_signal().await {
        error!("시그널 핸들러 등록 실패: {e}");
        lifecycle.shutdown();
    }

    handle.stop().await;
    info!("idsdash 종료");
    Ok(())
}
