//! Cross-crate 에러 경로 테스트.
//!
//! HTTP 응답 이상, 마운트 누락 등이 갱신기 상태까지 전파되는지 검증한다.

use idsdash_app::{DashboardRefresher, RefresherConfig};
use idsdash_core::error::CoreError;
use idsdash_network::http_client::HttpMetricsClient;
use idsdash_render::MemoryChartHost;
use std::sync::Arc;
use std::time::Duration;

fn refresher(base_url: &str, host: MemoryChartHost, stale_after: u64) -> DashboardRefresher {
    let client = HttpMetricsClient::with_default_path(base_url, Duration::from_secs(5)).unwrap();
    DashboardRefresher::new(
        RefresherConfig {
            stale_after_failures: stale_after,
            ..RefresherConfig::default()
        },
        Arc::new(client),
        Arc::new(host),
    )
}

#[tokio::test]
async fn non_json_body_is_invalid_payload() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/dashboard/api/chart")
        .with_status(200)
        .with_body("<html>login</html>")
        .create_async()
        .await;

    let r = refresher(&server.url(), MemoryChartHost::new(["trend", "pie"]), 3);
    let err = r.refresh().await.unwrap_err();
    assert!(matches!(err, CoreError::InvalidPayload(_)));
    mock.assert_async().await;

    let status = r.status();
    assert_eq!(status.consecutive_failures, 1);
    assert!(!status.stale);
}

#[tokio::test]
async fn wrong_shape_is_invalid_payload() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/dashboard/api/chart")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"trend": [{"time": "10:00"}], "pie": []}"#)
        .create_async()
        .await;

    let r = refresher(&server.url(), MemoryChartHost::new(["trend", "pie"]), 3);
    assert!(matches!(
        r.refresh().await,
        Err(CoreError::InvalidPayload(_))
    ));
}

#[tokio::test]
async fn repeated_auth_failures_turn_stale() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/dashboard/api/chart")
        .with_status(401)
        .expect(2)
        .create_async()
        .await;

    let r = refresher(&server.url(), MemoryChartHost::new(["trend", "pie"]), 2);
    assert!(matches!(r.refresh().await, Err(CoreError::Auth(_))));
    assert!(!r.status().stale);
    assert!(matches!(r.refresh().await, Err(CoreError::Auth(_))));
    assert!(r.status().stale);
    mock.assert_async().await;
}

#[tokio::test]
async fn missing_pie_mount_is_reported() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/dashboard/api/chart")
        .with_status(200)
        .with_body(r#"{"trend": [], "pie": []}"#)
        .create_async()
        .await;

    let r = refresher(&server.url(), MemoryChartHost::new(["trend"]), 3);
    let err = r.refresh().await.unwrap_err();
    match err {
        CoreError::MountPointNotFound { mount } => assert_eq!(mount, "pie"),
        other => panic!("예상 외 에러: {other:?}"),
    }
}
