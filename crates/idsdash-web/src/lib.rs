//! # idsdash-web
//!
//! 로컬 조회 API 서버.
//! Axum 기반 REST API로 현재 적용된 차트 옵션과 갱신 상태를 노출한다.
//!
//! ## 기능
//! - 전체/마운트별 차트 옵션 조회
//! - 갱신 상태 조회 (마지막 성공 시각, 마지막 에러, stale 여부)

pub mod error;
pub mod handlers;
pub mod routes;

use axum::Router;
use idsdash_core::config::WebConfig;
use idsdash_core::models::status::RefreshStatus;
use idsdash_render::MemoryChartHost;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// 포트 바인드 최대 시도 횟수
const MAX_PORT_ATTEMPTS: u16 = 10;

/// 웹 서버 애플리케이션 상태
#[derive(Clone)]
pub struct AppState {
    /// 갱신 루프가 옵션을 적용하는 인메모리 차트 호스트
    pub charts: Arc<MemoryChartHost>,
    /// 갱신 상태 수신기
    pub status_rx: watch::Receiver<RefreshStatus>,
}

/// 로컬 조회 API 서버
pub struct WebServer {
    config: WebConfig,
    state: AppState,
}

impl WebServer {
    /// 새 웹 서버 생성
    pub fn new(
        charts: Arc<MemoryChartHost>,
        status_rx: watch::Receiver<RefreshStatus>,
        config: WebConfig,
    ) -> Self {
        Self {
            config,
            state: AppState { charts, status_rx },
        }
    }

    /// 라우터 구성 (CORS + 요청 트레이싱)
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .nest("/api", routes::api_routes())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// 리스너 바인드
    ///
    /// 기본 포트에서 시작하여, 포트가 이미 사용 중이면 다음 포트를 시도한다.
    /// 최대 10개 포트를 시도한 후 실패하면 에러를 반환한다.
    /// 실제 주소는 반환된 리스너의 `local_addr()`로 확인한다.
    pub async fn bind(&self) -> Result<TcpListener, std::io::Error> {
        let host = if self.config.allow_external {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        };

        let base_port = self.config.port;
        let mut last_error = None;

        for attempt in 0..MAX_PORT_ATTEMPTS {
            let port = base_port.saturating_add(attempt);

            // u16 끝에서 포화되면 같은 포트를 반복 시도하게 됨
            if attempt > 0 && port == base_port.saturating_add(attempt - 1) {
                break;
            }

            let addr: SocketAddr = match format!("{host}:{port}").parse() {
                Ok(a) => a,
                Err(e) => {
                    error!("잘못된 주소 {host}:{port} - {e}");
                    continue;
                }
            };

            match TcpListener::bind(addr).await {
                Ok(listener) => {
                    if attempt > 0 {
                        warn!("포트 {base_port} 사용 불가, 대체 포트 {port} 사용");
                    }
                    return Ok(listener);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
                    warn!("포트 {port} 이미 사용 중, 다음 포트 시도...");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::AddrInUse,
                format!(
                    "포트 {}-{} 모두 사용 불가",
                    base_port,
                    base_port.saturating_add(MAX_PORT_ATTEMPTS - 1)
                ),
            )
        }))
    }

    /// 바인드된 리스너로 종료 신호까지 서비스
    pub async fn serve(
        self,
        listener: TcpListener,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> Result<(), std::io::Error> {
        info!("조회 API 서버 시작: http://{}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                loop {
                    if *shutdown_rx.borrow() {
                        info!("웹 서버 종료 신호 수신");
                        break;
                    }
                    if shutdown_rx.changed().await.is_err() {
                        break;
                    }
                }
            })
            .await?;

        info!("조회 API 서버 종료");
        Ok(())
    }

    /// 바인드 후 서비스 실행
    pub async fn run(self, shutdown_rx: watch::Receiver<bool>) -> Result<(), std::io::Error> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown_rx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use idsdash_core::chart_builder::trend_option;
    use idsdash_core::config::ChartConfig;
    use idsdash_core::models::payload::{TrendPoint, TrendSeries};
    use idsdash_core::ports::chart_surface::ChartHost;
    use serde_json::Value;
    use tower::ServiceExt;

    fn server() -> (WebServer, Arc<MemoryChartHost>, watch::Sender<RefreshStatus>) {
        let charts = Arc::new(MemoryChartHost::new(["trend", "pie"]));
        let (status_tx, status_rx) = watch::channel(RefreshStatus::default());
        let server = WebServer::new(charts.clone(), status_rx, WebConfig::default());
        (server, charts, status_tx)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn busy_port_falls_back_to_next() {
        let occupied = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let busy_port = occupied.local_addr().unwrap().port();

        let charts = Arc::new(MemoryChartHost::new(["trend"]));
        let (_status_tx, status_rx) = watch::channel(RefreshStatus::default());
        let config = WebConfig {
            port: busy_port,
            ..WebConfig::default()
        };
        let server = WebServer::new(charts, status_rx, config);

        let listener = server.bind().await.unwrap();
        let bound = listener.local_addr().unwrap().port();
        assert_ne!(bound, busy_port);
        assert!(bound > busy_port);
    }

    #[tokio::test]
    async fn charts_empty_before_first_refresh() {
        let (server, _, _) = server();
        let (status, body) = get(server.router(), "/api/charts").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({}));

        let (status, _) = get(server.router(), "/api/charts/trend").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn applied_option_is_served() {
        let (server, charts, _) = server();
        let series = TrendSeries::from_points(&[TrendPoint::new("10:00", 3u64)]);
        let option = trend_option(&series, &ChartConfig::default());
        charts.init("trend").unwrap().set_option(&option).unwrap();

        let (status, body) = get(server.router(), "/api/charts/trend").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["xAxis"]["data"], serde_json::json!(["10:00"]));
        assert_eq!(body["series"][0]["type"], "line");

        let (_, all) = get(server.router(), "/api/charts").await;
        assert!(all.get("trend").is_some());
        assert!(all.get("pie").is_none());
    }

    #[tokio::test]
    async fn unknown_mount_is_not_found() {
        let (server, _, _) = server();
        let (status, body) = get(server.router(), "/api/charts/heatmap").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
        assert!(body["error"].as_str().unwrap().contains("heatmap"));
    }

    #[tokio::test]
    async fn status_reflects_tracker() {
        let (server, _, status_tx) = server();
        status_tx.send_modify(|s| {
            s.consecutive_failures = 3;
            s.stale = true;
            s.last_error = Some("네트워크 오류: connection refused".to_string());
        });

        let (status, body) = get(server.router(), "/api/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stale"], true);
        assert_eq!(body["consecutive_failures"], 3);
        assert!(body["last_error"].as_str().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn run_stops_on_shutdown() {
        let charts = Arc::new(MemoryChartHost::new(["trend"]));
        let (_status_tx, status_rx) = watch::channel(RefreshStatus::default());
        let config = WebConfig {
            port: 0,
            ..WebConfig::default()
        };
        let server = WebServer::new(charts, status_rx, config);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(server.run(shutdown_rx));
        shutdown_tx.send(true).unwrap();
        assert!(task.await.unwrap().is_ok());
    }
}
