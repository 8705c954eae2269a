//! 에러 타입 -- 도메인별 에러 정의

/// Snortwatch 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum SnortwatchError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 스크레이프(수집 패스) 처리 에러
    #[error("scrape error: {0}")]
    Scrape(#[from] ScrapeError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 스크레이프 처리 에러
///
/// 파이프라인 크레이트의 상세 에러가 상위 레이어로 올라올 때 사용하는 요약 형태입니다.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// 소스 로그 파일을 읽을 수 없어 이번 스크레이프가 중단됨
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// 중복 제거 원장을 내구성 있게 기록하지 못함
    #[error("ledger write failed: {0}")]
    LedgerWrite(String),

    /// 그 밖의 스크레이프 실패
    #[error("scrape aborted: {0}")]
    Aborted(String),
}
