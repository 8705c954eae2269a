//! Snort 알림 로그 수집 파이프라인
//!
//! Snort `alert_json` 출력 파일을 읽어 새 알림만 골라내고, 규칙 식별자별 카테고리로
//! 분류하여 누적 카운터에 정확히 한 번씩 반영합니다.
//!
//! # 모듈 구성
//!
//! - [`decoder`]: 한 줄을 [`AlertRecord`]로 디코딩
//! - [`classifier`]: 규칙 식별자를 [`Category`]로 분류
//! - [`ledger`]: 이미 집계한 라인의 영속 집합
//! - [`counters`]: 카테고리별 단조 증가 카운터
//! - [`scrape`]: 한 번의 수집 패스 오케스트레이션
//! - [`config`]: 스크레이프 설정 (core 설정에서 파생)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! alert_json.txt -> ScrapeCoordinator -> Decoder -> Classifier -> AlertCounters
//!                        |    ^
//!                        v    |
//!                     DedupLedger (processed_logs.txt)
//! ```

pub mod classifier;
pub mod config;
pub mod counters;
pub mod decoder;
pub mod error;
pub mod ledger;
pub mod scrape;

// --- 주요 타입 re-export ---

// 코디네이터
pub use scrape::{ScrapeCoordinator, ScrapeCoordinatorBuilder, ScrapeReport, ScrapeState};

// 설정
pub use config::ScrapeConfig;

// 에러
pub use error::AlertPipelineError;

// 구성 요소
pub use classifier::{Category, classify};
pub use counters::{AlertCounters, CounterSnapshot};
pub use decoder::{AlertDecoder, AlertRecord};
pub use ledger::DedupLedger;
