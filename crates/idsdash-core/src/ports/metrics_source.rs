//! 메트릭 소스 포트.
//!
//! 구현: `idsdash-network` crate (reqwest)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::payload::MetricsPayload;

/// 집계 메트릭 제공자
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// 메트릭 페이로드 1회 조회
    ///
    /// 호출당 최대 한 번의 네트워크 요청을 보낸다. 재시도는 폴링 루프의 몫이다.
    async fn fetch_metrics(&self) -> Result<MetricsPayload, CoreError>;
}
