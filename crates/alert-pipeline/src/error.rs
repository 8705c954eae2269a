//! 알림 파이프라인 에러 타입
//!
//! [`AlertPipelineError`]는 한 번의 스크레이프(수집 패스) 안에서 발생하는 모든 에러를 표현합니다.
//! 어느 것도 프로세스를 종료시키지 않습니다. 호출자는 [`AlertPipelineError::is_line_level`]로
//! 라인 단위 에러(건너뛰고 계속)와 패스 단위 에러(이번 스크레이프 중단)를 구분합니다.
//!
//! `From<AlertPipelineError> for SnortwatchError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use snortwatch_core::error::{ScrapeError, SnortwatchError};

/// 알림 파이프라인 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum AlertPipelineError {
    /// JSON 객체로 디코딩할 수 없는 라인
    ///
    /// 원장에 기록하지 않으므로 다음 스크레이프에서 다시 시도됩니다
    /// (기록 도중 잘린 라인일 수 있음).
    #[error("malformed line at column {column}: {reason}")]
    MalformedLine {
        /// 실패 위치 (1부터 시작하는 열 번호, 알 수 없으면 0)
        column: usize,
        /// 실패 사유
        reason: String,
    },

    /// 소스 로그 파일을 열 수 없음 (없음, 권한 거부 등)
    #[error("source unavailable: {path}: {reason}")]
    SourceUnavailable {
        /// 소스 로그 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 소스 로그를 읽는 도중 I/O 에러
    #[error("source read error: {path}: {reason}")]
    SourceRead {
        /// 소스 로그 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 원장 파일이 존재하지만 읽을 수 없음
    #[error("ledger unavailable: {path}: {reason}")]
    LedgerUnavailable {
        /// 원장 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 새로 집계한 항목을 원장에 내구성 있게 기록하지 못함
    #[error("ledger write failed: {path}: {pending} entries not durable: {reason}")]
    LedgerWrite {
        /// 원장 경로
        path: String,
        /// 기록되지 못하고 메모리에 남은 항목 수
        pending: usize,
        /// 실패 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AlertPipelineError {
    /// 라인 하나만 건너뛰면 되는 에러인지 확인합니다.
    pub fn is_line_level(&self) -> bool {
        matches!(self, Self::MalformedLine { .. })
    }
}

impl From<AlertPipelineError> for SnortwatchError {
    fn from(err: AlertPipelineError) -> Self {
        let scrape = match &err {
            AlertPipelineError::SourceUnavailable { .. } => {
                ScrapeError::SourceUnavailable(err.to_string())
            }
            AlertPipelineError::LedgerWrite { .. } => ScrapeError::LedgerWrite(err.to_string()),
            _ => ScrapeError::Aborted(err.to_string()),
        };
        SnortwatchError::Scrape(scrape)
    }
}
