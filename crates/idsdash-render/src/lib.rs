//! # idsdash-render
//!
//! 차트 표면 어댑터. `ChartHost`/`ChartSurface` 포트 구현.
//!
//! - [`memory`] - 마운트별 최신 옵션 보관 (로컬 웹 API, 테스트)
//! - [`json_file`] - `<dir>/<mount>.json` 원자적 교체
//! - [`fanout`] - 여러 호스트에 동시에 적용

pub mod fanout;
pub mod json_file;
pub mod memory;

pub use fanout::FanOutChartHost;
pub use json_file::JsonFileChartHost;
pub use memory::MemoryChartHost;
