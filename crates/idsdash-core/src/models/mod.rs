//! IDS 대시보드 도메인 모델.
//!
//! 백엔드 메트릭 페이로드, 파생 시계열, 차트 옵션, 갱신 상태를 정의한다.
//! 모든 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod chart;
pub mod payload;
pub mod status;
