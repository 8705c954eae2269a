//! 스크레이프 코디네이터 -- 한 번의 수집 패스를 처음부터 끝까지 수행합니다.
//!
//! [`ScrapeCoordinator`]는 원장, 디코더, 분류기, 카운터를 순서대로 구동합니다.
//!
//! # 상태 전이
//! ```text
//! Idle -> Loading -> Streaming -> Committing -> Idle
//!            |           |
//!            +-----------+--> (중단) -> Idle
//! ```
//!
//! 패스 도중에는 카테고리별 집계를 지역 변수에만 쌓아두고, 커밋 단계에 도달한 뒤에야
//! 공유 카운터에 반영합니다. 소스를 읽다가 중단된 패스는 카운터도 원장도 바꾸지 않습니다.
//!
//! `scrape`는 `&mut self`를 요구하므로 같은 원장에 대한 두 패스가 겹칠 수 없습니다.
//! 여러 태스크에서 공유할 때는 `tokio::sync::Mutex`로 감싸 직렬화합니다.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use snortwatch_core::pipeline::HealthStatus;
use tokio::io::AsyncBufReadExt;

use crate::classifier::{Category, classify};
use crate::config::ScrapeConfig;
use crate::counters::{AlertCounters, CounterSnapshot};
use crate::decoder::AlertDecoder;
use crate::error::AlertPipelineError;
use crate::ledger::DedupLedger;

/// 스크레이프 진행 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeState {
    /// 대기 중
    Idle,
    /// 원장 로드 중
    Loading,
    /// 소스 로그 읽는 중
    Streaming,
    /// 원장 기록 중
    Committing,
}

impl ScrapeState {
    /// 상태 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Streaming => "streaming",
            Self::Committing => "committing",
        }
    }
}

/// 한 번의 패스 결과 요약
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScrapeReport {
    /// 읽은 라인 수 (빈 라인 포함)
    pub lines_read: u64,
    /// 이번 패스에서 새로 집계한 카테고리별 알림 수
    pub new_alerts: CounterSnapshot,
    /// 이미 집계되어 건너뛴 라인 수
    pub skipped_seen: u64,
    /// 공백뿐이라 건너뛴 라인 수
    pub skipped_empty: u64,
    /// 디코딩에 실패해 다음 패스로 미룬 라인 수
    pub skipped_malformed: u64,
    /// 원장에 기록한 항목 수 (이전 패스에서 남은 항목 포함)
    pub committed: usize,
}

/// 스트리밍 단계의 중간 결과
struct StreamOutcome {
    report: ScrapeReport,
    new_identities: Vec<String>,
}

/// 스크레이프 코디네이터
///
/// # 사용 예시
/// ```ignore
/// use snortwatch_alert_pipeline::{ScrapeConfig, ScrapeCoordinatorBuilder};
///
/// let mut coordinator = ScrapeCoordinatorBuilder::new()
///     .config(ScrapeConfig::default())
///     .build()?;
///
/// let report = coordinator.scrape().await?;
/// println!("new alerts: {}", report.new_alerts.total());
/// ```
pub struct ScrapeCoordinator {
    config: ScrapeConfig,
    decoder: AlertDecoder,
    ledger: DedupLedger,
    counters: Arc<AlertCounters>,
    state: ScrapeState,
    health: HealthStatus,
    /// 커밋까지 성공한 패스 수
    completed: u64,
}

impl ScrapeCoordinator {
    /// 수집 패스를 한 번 수행합니다.
    ///
    /// # 에러
    /// - `LedgerUnavailable`, `SourceUnavailable`, `SourceRead`: 패스가 중단되며
    ///   카운터와 원장은 바뀌지 않습니다.
    /// - `LedgerWrite`: 카운터에는 반영되었으나 원장에 기록되지 못한 항목이 남습니다.
    ///   남은 항목은 다음 패스에서 다시 기록을 시도합니다.
    pub async fn scrape(&mut self) -> Result<ScrapeReport, AlertPipelineError> {
        self.state = ScrapeState::Loading;
        if let Err(e) = self.ledger.load().await {
            return Err(self.abort(e));
        }

        self.state = ScrapeState::Streaming;
        let outcome = match self.stream().await {
            Ok(outcome) => outcome,
            Err(e) => return Err(self.abort(e)),
        };
        let StreamOutcome {
            mut report,
            new_identities,
        } = outcome;

        self.state = ScrapeState::Committing;
        let commit = self.ledger.commit(new_identities).await;

        // 원장 기록 성공 여부와 관계없이 이번 패스의 집계는 반영됨
        for category in Category::ALL {
            let n = report.new_alerts.get(category);
            if n > 0 {
                self.counters.increment_by(category, n);
            }
        }
        self.state = ScrapeState::Idle;

        match commit {
            Ok(committed) => {
                report.committed = committed;
                self.completed += 1;
                self.health = HealthStatus::Healthy;
                tracing::info!(
                    lines = report.lines_read,
                    new_alerts = report.new_alerts.total(),
                    seen = report.skipped_seen,
                    malformed = report.skipped_malformed,
                    committed,
                    "scrape completed"
                );
                Ok(report)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    new_alerts = report.new_alerts.total(),
                    "ledger commit failed, counted alerts are not durable"
                );
                self.health = HealthStatus::Degraded(e.to_string());
                Err(e)
            }
        }
    }

    /// 소스 로그를 처음부터 끝까지 읽으며 새 알림을 집계합니다.
    async fn stream(&self) -> Result<StreamOutcome, AlertPipelineError> {
        let path = &self.config.source_path;
        let file = tokio::fs::File::open(path).await.map_err(|e| {
            AlertPipelineError::SourceUnavailable {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        let mut reader = tokio::io::BufReader::new(file);

        let mut report = ScrapeReport::default();
        let mut new_identities = Vec::new();
        let mut pass_seen: HashSet<String> = HashSet::new();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let n = reader.read_until(b'\n', &mut buf).await.map_err(|e| {
                AlertPipelineError::SourceRead {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
            })?;
            if n == 0 {
                break;
            }
            report.lines_read += 1;

            let Ok(text) = std::str::from_utf8(&buf) else {
                report.skipped_malformed += 1;
                tracing::debug!(line = report.lines_read, "skipping non-UTF-8 line");
                continue;
            };
            let line = text.trim();
            if line.is_empty() {
                report.skipped_empty += 1;
                continue;
            }

            if self.ledger.contains(line) || pass_seen.contains(line) {
                report.skipped_seen += 1;
                continue;
            }

            let record = match self.decoder.decode(line) {
                Ok(record) => record,
                Err(e) => {
                    report.skipped_malformed += 1;
                    tracing::debug!(line = report.lines_read, error = %e, "skipping malformed line");
                    continue;
                }
            };

            let category = classify(record.rule());
            report.new_alerts.add(category, 1);
            tracing::debug!(
                line = report.lines_read,
                rule = record.rule(),
                category = %category,
                total = report.new_alerts.get(category),
                "new alert"
            );

            let identity = record.into_raw();
            pass_seen.insert(identity.clone());
            new_identities.push(identity);
        }

        Ok(StreamOutcome {
            report,
            new_identities,
        })
    }

    /// 패스를 중단하고 대기 상태로 되돌립니다.
    fn abort(&mut self, err: AlertPipelineError) -> AlertPipelineError {
        tracing::warn!(state = self.state.as_str(), error = %err, "scrape aborted");
        self.state = ScrapeState::Idle;
        self.health = HealthStatus::Degraded(err.to_string());
        err
    }

    /// 현재 상태
    pub fn state(&self) -> ScrapeState {
        self.state
    }

    /// 마지막 패스 기준 건강 상태
    ///
    /// 원장에 기록되지 못한 항목이 남아 있으면 `Degraded`입니다.
    pub fn health(&self) -> HealthStatus {
        match &self.health {
            HealthStatus::Healthy if self.ledger.pending_count() > 0 => HealthStatus::Degraded(
                format!("{} ledger entries not durable", self.ledger.pending_count()),
            ),
            other => other.clone(),
        }
    }

    /// 공유 카운터
    pub fn counters(&self) -> Arc<AlertCounters> {
        Arc::clone(&self.counters)
    }

    /// 설정
    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// 메모리에 있는 원장 항목 수
    pub fn ledger_len(&self) -> usize {
        self.ledger.len()
    }

    /// 원장에 기록되지 못하고 남은 항목 수
    pub fn pending_count(&self) -> usize {
        self.ledger.pending_count()
    }

    /// 커밋까지 성공한 패스 수
    pub fn completed_scrapes(&self) -> u64 {
        self.completed
    }
}

/// 스크레이프 코디네이터 빌더
pub struct ScrapeCoordinatorBuilder {
    config: ScrapeConfig,
    counters: Option<Arc<AlertCounters>>,
    dry_run: bool,
}

impl ScrapeCoordinatorBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: ScrapeConfig::default(),
            counters: None,
            dry_run: false,
        }
    }

    /// 스크레이프 설정을 지정합니다.
    pub fn config(mut self, config: ScrapeConfig) -> Self {
        self.config = config;
        self
    }

    /// 메트릭 엔드포인트와 공유할 카운터를 지정합니다.
    ///
    /// 지정하지 않으면 내보내기 없는 카운터를 새로 만듭니다.
    pub fn counters(mut self, counters: Arc<AlertCounters>) -> Self {
        self.counters = Some(counters);
        self
    }

    /// 원장 파일을 읽지도 쓰지도 않는 메모리 원장을 사용합니다.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 코디네이터를 빌드합니다.
    pub fn build(self) -> Result<ScrapeCoordinator, AlertPipelineError> {
        self.config.validate()?;

        let ledger = if self.dry_run {
            DedupLedger::ephemeral()
        } else {
            DedupLedger::open(&self.config.ledger_path)
        };

        Ok(ScrapeCoordinator {
            decoder: AlertDecoder::new(),
            config: self.config,
            ledger,
            counters: self.counters.unwrap_or_default(),
            state: ScrapeState::Idle,
            health: HealthStatus::Healthy,
            completed: 0,
        })
    }
}

impl Default for ScrapeCoordinatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
