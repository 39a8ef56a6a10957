//! API 핸들러 모듈.

pub mod charts;
pub mod status;
