//! 스크레이프 설정
//!
//! [`ScrapeConfig`]는 core의 [`SnortwatchConfig`](snortwatch_core::config::SnortwatchConfig)에서
//! 수집 패스에 필요한 값만 골라 담습니다.
//!
//! # 사용 예시
//! ```ignore
//! use snortwatch_core::config::SnortwatchConfig;
//! use snortwatch_alert_pipeline::config::ScrapeConfig;
//!
//! let core_config = SnortwatchConfig::default();
//! let config = ScrapeConfig::from_core(&core_config);
//! ```

use std::path::PathBuf;

use snortwatch_core::config::SnortwatchConfig;

use crate::error::AlertPipelineError;

/// 수집 패스 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeConfig {
    /// Snort `alert_json` 로그 경로
    pub source_path: PathBuf,
    /// 중복 제거 원장 경로
    pub ledger_path: PathBuf,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("/var/log/snort/alert_json.txt"),
            ledger_path: PathBuf::from("/tmp/processed_logs.txt"),
        }
    }
}

impl ScrapeConfig {
    /// core 설정에서 스크레이프 설정을 생성합니다.
    pub fn from_core(core: &SnortwatchConfig) -> Self {
        Self {
            source_path: PathBuf::from(&core.source.path),
            ledger_path: PathBuf::from(&core.ledger.path),
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), AlertPipelineError> {
        if self.source_path.as_os_str().is_empty() {
            return Err(AlertPipelineError::Config {
                field: "source_path".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if self.ledger_path.as_os_str().is_empty() {
            return Err(AlertPipelineError::Config {
                field: "ledger_path".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        // 원장이 소스를 덮어쓰면 센서 로그가 오염됨
        if self.source_path == self.ledger_path {
            return Err(AlertPipelineError::Config {
                field: "ledger_path".to_owned(),
                reason: "must differ from source_path".to_owned(),
            });
        }

        Ok(())
    }
}
