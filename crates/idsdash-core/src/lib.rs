//! # idsdash-core
//!
//! IDS 대시보드 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`] - 페이로드/차트 옵션/갱신 상태 (serde Serialize/Deserialize)
//! - [`chart_builder`] - 페이로드 → ECharts 옵션 변환
//! - [`ports`] - Hexagonal Architecture 포트 인터페이스
//! - [`error`] - 핵심 에러 타입 (thiserror)
//! - [`config`] - 애플리케이션 설정 구조체
//! - [`config_manager`] - 설정 파일 관리 (로드/저장)

pub mod chart_builder;
pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;
