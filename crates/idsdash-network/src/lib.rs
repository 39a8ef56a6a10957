//! # idsdash-network
//!
//! IDS 백엔드 HTTP 어댑터.
//! 집계 메트릭 엔드포인트를 조회해 [`MetricsPayload`]로 역직렬화한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use idsdash_network::http_client::HttpMetricsClient;
//!
//! let client = HttpMetricsClient::with_default_path("http://localhost:5000", timeout)?;
//! let payload = client.fetch_metrics().await?;
//! ```
//!
//! [`MetricsPayload`]: idsdash_core::models::payload::MetricsPayload

pub mod http_client;
