//! Snortwatch 공통 설정, 에러, 메트릭 이름, 상태 타입
//!
//! # 모듈 구성
//!
//! - [`config`]: `snortwatch.toml` 파싱, 환경변수 오버라이드, 검증
//! - [`error`]: 최상위 에러 타입
//! - [`metrics`]: 알림 카운터 메트릭 이름과 HELP 텍스트
//! - [`pipeline`]: 수집 패스 건강 상태

pub mod config;
pub mod error;
pub mod metrics;
pub mod pipeline;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, ScrapeError, SnortwatchError};

// 설정
pub use config::SnortwatchConfig;

// 상태
pub use pipeline::HealthStatus;
