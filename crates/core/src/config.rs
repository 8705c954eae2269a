//! 설정 관리 -- snortwatch.toml 파싱 및 런타임 설정
//!
//! [`SnortwatchConfig`]는 모든 구성 요소의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`SNORTWATCH_SOURCE_PATH=/var/log/snort/alert_json.txt` 형식)
//! 3. 설정 파일 (`snortwatch.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), snortwatch_core::error::SnortwatchError> {
//! use snortwatch_core::config::SnortwatchConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = SnortwatchConfig::load("snortwatch.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = SnortwatchConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, SnortwatchError};

/// 건강 상태 조회 경로 (메트릭 경로로 사용할 수 없음)
pub const HEALTH_ENDPOINT: &str = "/health";

/// Snortwatch 통합 설정
///
/// `snortwatch.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnortwatchConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 알림 소스 로그 설정
    #[serde(default)]
    pub source: SourceConfig,
    /// 중복 제거 원장 설정
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Prometheus 메트릭 엔드포인트 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl SnortwatchConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SnortwatchError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일 없이 기본값 + 환경변수 오버라이드로 설정을 만듭니다.
    pub fn from_env() -> Result<Self, SnortwatchError> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, SnortwatchError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SnortwatchError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                SnortwatchError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, SnortwatchError> {
        toml::from_str(toml_str).map_err(|e| {
            SnortwatchError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `SNORTWATCH_{SECTION}_{FIELD}`
    /// 예: `SNORTWATCH_METRICS_PORT=9100`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "SNORTWATCH_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "SNORTWATCH_GENERAL_LOG_FORMAT");

        // Source
        override_string(&mut self.source.path, "SNORTWATCH_SOURCE_PATH");

        // Ledger
        override_string(&mut self.ledger.path, "SNORTWATCH_LEDGER_PATH");

        // Metrics
        override_string(
            &mut self.metrics.listen_addr,
            "SNORTWATCH_METRICS_LISTEN_ADDR",
        );
        override_u16(&mut self.metrics.port, "SNORTWATCH_METRICS_PORT");
        override_string(&mut self.metrics.endpoint, "SNORTWATCH_METRICS_ENDPOINT");
        override_string(&mut self.metrics.namespace, "SNORTWATCH_METRICS_NAMESPACE");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), SnortwatchError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(invalid(
                "general.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(invalid(
                "general.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        validate_file_path("source.path", &self.source.path)?;
        validate_file_path("ledger.path", &self.ledger.path)?;

        // 소스 로그는 읽기 전용이므로 원장과 같은 파일을 가리키면 안 됩니다
        if Path::new(&self.source.path) == Path::new(&self.ledger.path) {
            return Err(invalid(
                "ledger.path",
                "must not be the same file as source.path".to_owned(),
            ));
        }

        if self.metrics.port == 0 {
            return Err(invalid("metrics.port", "must be greater than 0".to_owned()));
        }

        if self.metrics.listen_addr.is_empty() {
            return Err(invalid(
                "metrics.listen_addr",
                "must not be empty".to_owned(),
            ));
        }

        if !self.metrics.endpoint.starts_with('/') {
            return Err(invalid(
                "metrics.endpoint",
                format!("'{}' must start with '/'", self.metrics.endpoint),
            ));
        }

        if self.metrics.endpoint == HEALTH_ENDPOINT {
            return Err(invalid(
                "metrics.endpoint",
                format!("'{}' is reserved for the health route", HEALTH_ENDPOINT),
            ));
        }

        if !is_valid_metric_prefix(&self.metrics.namespace) {
            return Err(invalid(
                "metrics.namespace",
                format!(
                    "'{}' must match [a-zA-Z_][a-zA-Z0-9_]*",
                    self.metrics.namespace
                ),
            ));
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 알림 소스 로그 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Snort JSON 알림 로그 경로 (한 줄에 JSON 객체 하나, 길이 제한 없음)
    pub path: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: "/var/log/snort/alert_json.txt".to_owned(),
        }
    }
}

/// 중복 제거 원장 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// 이미 집계한 라인을 한 줄씩 기록하는 append-only 파일 경로
    pub path: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: "/tmp/processed_logs.txt".to_owned(),
        }
    }
}

/// Prometheus 메트릭 엔드포인트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// 바인드 주소
    pub listen_addr: String,
    /// 포트
    pub port: u16,
    /// 스크레이프 경로
    pub endpoint: String,
    /// 메트릭 이름 접두어 (`{namespace}_ssh_total` 등)
    pub namespace: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_owned(),
            port: 8000,
            endpoint: "/metrics".to_owned(),
            namespace: "snort".to_owned(),
        }
    }
}

fn invalid(field: &str, reason: String) -> SnortwatchError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason,
    }
    .into()
}

/// 파일 경로가 비어 있지 않고 ".." 컴포넌트를 포함하지 않는지 검증합니다.
fn validate_file_path(field: &str, path_str: &str) -> Result<(), SnortwatchError> {
    if path_str.is_empty() {
        return Err(invalid(field, "path must not be empty".to_owned()));
    }

    if Path::new(path_str)
        .components()
        .any(|c| c == Component::ParentDir)
    {
        return Err(invalid(
            field,
            format!("path '{}' contains path traversal pattern '..'", path_str),
        ));
    }

    Ok(())
}

fn is_valid_metric_prefix(namespace: &str) -> bool {
    let mut chars = namespace.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u16>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            ),
        }
    }
}
