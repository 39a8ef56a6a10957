//! IDS 대시보드 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 자체 에러 타입에서 `CoreError`로 변환하거나 그대로 전파한다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 네트워크, 페이로드 파싱, 차트 마운트, 설정 등 도메인 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 네트워크 에러 (연결 실패, 타임아웃)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 응답 본문이 JSON이 아니거나 메트릭 페이로드 형식이 아님
    #[error("잘못된 메트릭 페이로드: {0}")]
    InvalidPayload(String),

    /// 차트 마운트 지점을 찾을 수 없음
    #[error("차트 마운트 지점 미발견: {mount}")]
    MountPointNotFound {
        /// 마운트 식별자 (예: "trend", "pie")
        mount: String,
    },

    /// 인증 실패 (세션 만료 등)
    #[error("인증 에러: {0}")]
    Auth(String),

    /// 리소스를 찾을 수 없음
    #[error("{resource_type} 미발견: {id}")]
    NotFound {
        /// 리소스 종류 (예: "API")
        resource_type: String,
        /// 리소스 식별자
        id: String,
    },

    /// Rate Limit 초과 (429)
    #[error("요청 한도 초과, {retry_after_secs}초 후 재시도")]
    RateLimit {
        /// 재시도 대기 시간 (초)
        retry_after_secs: u64,
    },

    /// 서비스 일시 불가 (503)
    #[error("서비스 일시 불가: {0}")]
    ServiceUnavailable(String),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// 일시적인 장애인지 여부 (다음 폴링 주기에서 회복 가능)
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CoreError::Network(_) | CoreError::ServiceUnavailable(_) | CoreError::RateLimit { .. }
        )
    }
}
