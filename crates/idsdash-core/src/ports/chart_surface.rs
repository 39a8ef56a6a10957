//! 차트 렌더링 포트.
//!
//! 차트 엔진의 `init(mount) -> surface`, `surface.setOption(option)` 계약.
//! 구현: `idsdash-render` crate (인메모리, JSON 파일)

use std::sync::Arc;

use crate::error::CoreError;
use crate::models::chart::ChartOption;

/// 마운트 지점에 바인딩된 차트 표면
pub trait ChartSurface: Send + Sync {
    /// 바인딩된 마운트 식별자
    fn mount(&self) -> &str;

    /// 옵션 전체 교체
    fn set_option(&self, option: &ChartOption) -> Result<(), CoreError>;
}

/// 차트 표면 생성기
pub trait ChartHost: Send + Sync {
    /// 마운트 지점에 차트 표면 바인딩
    ///
    /// 마운트 지점이 없으면 [`CoreError::MountPointNotFound`]를 반환한다.
    fn init(&self, mount: &str) -> Result<Arc<dyn ChartSurface>, CoreError>;
}
