//! 애플리케이션 설정 구조체.
//!
//! 백엔드 URL, 갱신 주기, 차트 마운트/스타일, 출력 경로, 로컬 웹 API 설정을
//! 정의한다. [`crate::config_manager::ConfigManager`]를 통해 JSON 파일에서 로드.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 백엔드 연결 설정
    pub server: ServerConfig,
    /// 갱신 루프 설정
    #[serde(default)]
    pub refresh: RefreshConfig,
    /// 차트 설정
    #[serde(default)]
    pub chart: ChartConfig,
    /// 차트 옵션 파일 출력 설정
    #[serde(default)]
    pub output: OutputConfig,
    /// 로컬 웹 API 설정
    #[serde(default)]
    pub web: WebConfig,
}

// ============================================================
// 서버 설정
// ============================================================

/// 백엔드 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// IDS 백엔드 기본 URL (예: "http://localhost:5000")
    pub base_url: String,
    /// 집계 메트릭 엔드포인트 경로
    #[serde(default = "default_chart_path")]
    pub chart_path: String,
    /// 요청 타임아웃 (밀리초)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

// ============================================================
// 갱신 설정
// ============================================================

/// 갱신 루프 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// 폴링 주기 (밀리초)
    #[serde(default = "default_refresh_interval_ms")]
    pub interval_ms: u64,
    /// 이 횟수만큼 연속 실패하면 stale 표시
    #[serde(default = "default_stale_after_failures")]
    pub stale_after_failures: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_refresh_interval_ms(),
            stale_after_failures: default_stale_after_failures(),
        }
    }
}

// ============================================================
// 차트 설정
// ============================================================

/// 파이 항목 검증 정책
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PieValidation {
    /// 백엔드 항목을 그대로 전달
    #[default]
    PassThrough,
    /// 이름이 비었거나 값이 음수/비유한인 항목 제외
    Strict,
}

/// 차트 마운트 및 스타일 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// 추세 차트 마운트 식별자
    #[serde(default = "default_trend_mount")]
    pub trend_mount: String,
    /// 파이 차트 마운트 식별자
    #[serde(default = "default_pie_mount")]
    pub pie_mount: String,
    /// 추세 차트 y축 이름
    #[serde(default = "default_value_axis_name")]
    pub value_axis_name: String,
    /// 파이 반지름 (컨테이너 대비)
    #[serde(default = "default_pie_radius")]
    pub pie_radius: String,
    /// 파이 항목 검증 정책
    #[serde(default)]
    pub pie_validation: PieValidation,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            trend_mount: default_trend_mount(),
            pie_mount: default_pie_mount(),
            value_axis_name: default_value_axis_name(),
            pie_radius: default_pie_radius(),
            pie_validation: PieValidation::PassThrough,
        }
    }
}

// ============================================================
// 출력/웹 설정
// ============================================================

/// 차트 옵션 파일 출력 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 옵션 JSON을 쓸 디렉토리 (None이면 파일 출력 비활성화)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

/// 로컬 웹 API 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// 웹 API 활성화 여부
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 바인드 포트
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// 외부 접속 허용 (0.0.0.0 바인드)
    #[serde(default)]
    pub allow_external: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_web_port(),
            allow_external: false,
        }
    }
}

// ============================================================
// AppConfig impl
// ============================================================

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig {
                base_url: "http://localhost:5000".to_string(),
                chart_path: default_chart_path(),
                request_timeout_ms: default_request_timeout_ms(),
            },
            refresh: RefreshConfig::default(),
            chart: ChartConfig::default(),
            output: OutputConfig::default(),
            web: WebConfig::default(),
        }
    }

    /// 서버 요청 타임아웃을 Duration으로 반환
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.request_timeout_ms)
    }

    /// 폴링 주기를 Duration으로 반환
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh.interval_ms)
    }

    /// 설정값 유효성 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.server.base_url.trim().is_empty() {
            return Err(CoreError::Config("server.base_url이 비어 있습니다".to_string()));
        }
        if !self.server.chart_path.starts_with('/') {
            return Err(CoreError::Config(format!(
                "server.chart_path는 '/'로 시작해야 합니다: {}",
                self.server.chart_path
            )));
        }
        if self.refresh.interval_ms == 0 {
            return Err(CoreError::Config(
                "refresh.interval_ms는 0보다 커야 합니다".to_string(),
            ));
        }
        if self.refresh.interval_ms <= self.server.request_timeout_ms {
            return Err(CoreError::Config(format!(
                "refresh.interval_ms({})는 server.request_timeout_ms({})보다 커야 합니다",
                self.refresh.interval_ms, self.server.request_timeout_ms
            )));
        }
        if self.chart.trend_mount == self.chart.pie_mount {
            return Err(CoreError::Config(format!(
                "추세/파이 차트 마운트가 같습니다: {}",
                self.chart.trend_mount
            )));
        }
        Ok(())
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_true() -> bool {
    true
}

fn default_chart_path() -> String {
    "/dashboard/api/chart".to_string()
}
fn default_request_timeout_ms() -> u64 {
    10_000
}
fn default_refresh_interval_ms() -> u64 {
    30_000
}
fn default_stale_after_failures() -> u64 {
    3
}
fn default_trend_mount() -> String {
    "trend".to_string()
}
fn default_pie_mount() -> String {
    "pie".to_string()
}
fn default_value_axis_name() -> String {
    "次数".to_string()
}
fn default_pie_radius() -> String {
    "60%".to_string()
}
fn default_web_port() -> u16 {
    9095
}
