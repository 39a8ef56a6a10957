//! HTTP 메트릭 클라이언트.
//!
//! `MetricsSource` 포트 구현. 호출당 `GET {base_url}{chart_path}` 한 번.

use async_trait::async_trait;
use idsdash_core::error::CoreError;
use idsdash_core::models::payload::MetricsPayload;
use idsdash_core::ports::metrics_source::MetricsSource;
use std::time::Duration;
use tracing::debug;

/// 집계 메트릭 기본 경로
pub const DEFAULT_CHART_PATH: &str = "/dashboard/api/chart";

/// Retry-After 헤더가 없을 때 기본 대기 시간 (초)
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// 에러 메시지에 담을 응답 본문 최대 길이
const MAX_ERROR_BODY_CHARS: usize = 200;

/// REST 메트릭 클라이언트 - `MetricsSource` 포트 구현
pub struct HttpMetricsClient {
    client: reqwest::Client,
    base_url: String,
    chart_path: String,
}

impl HttpMetricsClient {
    /// 새 HTTP 메트릭 클라이언트 생성
    pub fn new(base_url: &str, chart_path: &str, timeout: Duration) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            chart_path: chart_path.to_string(),
        })
    }

    /// 기본 경로(`/dashboard/api/chart`)로 생성
    pub fn with_default_path(base_url: &str, timeout: Duration) -> Result<Self, CoreError> {
        Self::new(base_url, DEFAULT_CHART_PATH, timeout)
    }

    /// 요청 대상 URL
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, self.chart_path)
    }

    /// 응답 상태 코드 확인 및 에러 매핑
    async fn check_response(
        &self,
        resp: reqwest::Response,
    ) -> Result<reqwest::Response, CoreError> {
        let status = resp.status();

        if status.is_success() {
            return Ok(resp);
        }

        let retry_after = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let text = resp.text().await.unwrap_or_else(|e| {
            tracing::warn!("응답 본문 읽기 실패: {e}");
            String::new()
        });
        let text = truncate(&text, MAX_ERROR_BODY_CHARS);

        match status.as_u16() {
            401 | 403 => Err(CoreError::Auth(format!("인증 실패 ({status}): {text}"))),
            404 => Err(CoreError::NotFound {
                resource_type: "API".to_string(),
                id: self.chart_path.clone(),
            }),
            429 => Err(CoreError::RateLimit {
                retry_after_secs: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
            }),
            503 => Err(CoreError::ServiceUnavailable(text)),
            _ => Err(CoreError::Internal(format!("API 에러 ({status}): {text}"))),
        }
    }
}

#[async_trait]
impl MetricsSource for HttpMetricsClient {
    async fn fetch_metrics(&self) -> Result<MetricsPayload, CoreError> {
        let url = self.endpoint();
        debug!("메트릭 요청: GET {url}");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("메트릭 요청 실패: {e}")))?;

        let resp = self.check_response(resp).await?;
        let body = resp
            .bytes()
            .await
            .map_err(|e| CoreError::Network(format!("메트릭 응답 수신 실패: {e}")))?;

        let payload: MetricsPayload = serde_json::from_slice(&body)
            .map_err(|e| CoreError::InvalidPayload(format!("메트릭 응답 파싱 실패: {e}")))?;

        debug!(
            "메트릭 수신: trend {}개, pie {}개",
            payload.trend.len(),
            payload.pie.len()
        );
        Ok(payload)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::ServerGuard) -> HttpMetricsClient {
        HttpMetricsClient::with_default_path(&server.url(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn http_client_creation() {
        let client =
            HttpMetricsClient::with_default_path("http://localhost:5000/", Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.base_url, "http://localhost:5000");
        assert_eq!(client.endpoint(), "http://localhost:5000/dashboard/api/chart");
    }

    #[test]
    fn custom_path() {
        let client =
            HttpMetricsClient::new("http://ids", "/api/v2/chart", Duration::from_secs(5)).unwrap();
        assert_eq!(client.endpoint(), "http://ids/api/v2/chart");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("공격탐지", 2), "공격…");
    }

    #[tokio::test]
    async fn fetch_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/dashboard/api/chart")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"trend":[{"time":"10:00","count":3},{"time":"10:05","count":7}],
                    "pie":[{"name":"A","value":5},{"name":"B","value":2}]}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let payload = client_for(&server).fetch_metrics().await.unwrap();
        assert_eq!(payload.trend.len(), 2);
        assert_eq!(payload.trend[0].time, "10:00");
        assert_eq!(payload.pie[1].name, "B");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_json_body_is_invalid_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/dashboard/api/chart")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html>login</html>")
            .create_async()
            .await;

        let err = client_for(&server).fetch_metrics().await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidPayload(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn wrong_shape_is_invalid_payload() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/dashboard/api/chart")
            .with_status(200)
            .with_body(r#"{"trend":[{"time":"10:00"}],"pie":[]}"#)
            .create_async()
            .await;

        let err = client_for(&server).fetch_metrics().await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidPayload(_)));
    }

    #[tokio::test]
    async fn unauthorized_maps_to_auth() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/dashboard/api/chart")
            .with_status(401)
            .with_body("Unauthorized")
            .create_async()
            .await;

        let err = client_for(&server).fetch_metrics().await.unwrap_err();
        assert!(err.to_string().contains("인증"));
    }

    #[tokio::test]
    async fn not_found_names_path() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/dashboard/api/chart")
            .with_status(404)
            .create_async()
            .await;

        let err = client_for(&server).fetch_metrics().await.unwrap_err();
        match err {
            CoreError::NotFound { id, .. } => assert_eq!(id, DEFAULT_CHART_PATH),
            other => panic!("예상치 못한 에러: {other:?}"),
        }
    }

    #[tokio::test]
    async fn rate_limit_uses_retry_after() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/dashboard/api/chart")
            .with_status(429)
            .with_header("retry-after", "12")
            .create_async()
            .await;

        let err = client_for(&server).fetch_metrics().await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::RateLimit {
                retry_after_secs: 12
            }
        ));
    }

    #[tokio::test]
    async fn service_unavailable_503() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/dashboard/api/chart")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let err = client_for(&server).fetch_metrics().await.unwrap_err();
        assert!(matches!(err, CoreError::ServiceUnavailable(ref m) if m == "maintenance"));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn server_error_is_internal() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/dashboard/api/chart")
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let err = client_for(&server).fetch_metrics().await.unwrap_err();
        assert!(matches!(err, CoreError::Internal(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        // 도달 불가 URL → 네트워크 에러
        let client =
            HttpMetricsClient::with_default_path("http://127.0.0.1:1", Duration::from_secs(2))
                .unwrap();
        let err = client.fetch_metrics().await.unwrap_err();
        assert!(matches!(err, CoreError::Network(_)));
    }
}
