//! 통합 테스트 -- 소스 로그부터 카운터/원장까지의 전체 수집 흐름 검증

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusBuilder;
use proptest::prelude::*;

use snortwatch_alert_pipeline::{
    AlertCounters, AlertPipelineError, Category, ScrapeConfig, ScrapeCoordinator,
    ScrapeCoordinatorBuilder, classify,
};

const BRUTE_FORCE: &str = r#"{"timestamp":"10/21-12:00:01.000001","rule":"1:1000001:1","msg":"SSH brute force attempt","src_addr":"10.0.0.5","dst_addr":"10.0.0.1"}"#;
const SSH_CONNECTION: &str = r#"{"timestamp":"10/21-12:00:02.000002","rule":"1:1000002:1","msg":"SSH connection","src_addr":"10.0.0.6","dst_addr":"10.0.0.1"}"#;
const UNLISTED: &str = r#"{"timestamp":"10/21-12:00:03.000003","rule":"1:1000099:9","msg":"something else","src_addr":"10.0.0.7"}"#;
const ICMP: &str = r#"{"timestamp":"10/21-12:00:04.000004","rule":"1:1000004:1","msg":"ICMP echo","src_addr":"10.0.0.8"}"#;

struct Fixture {
    _dir: tempfile::TempDir,
    source: PathBuf,
    ledger: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("alert_json.txt");
        let ledger = dir.path().join("processed_logs.txt");
        Self {
            _dir: dir,
            source,
            ledger,
        }
    }

    fn config(&self) -> ScrapeConfig {
        ScrapeConfig {
            source_path: self.source.clone(),
            ledger_path: self.ledger.clone(),
        }
    }

    fn coordinator(&self, counters: Arc<AlertCounters>) -> ScrapeCoordinator {
        ScrapeCoordinatorBuilder::new()
            .config(self.config())
            .counters(counters)
            .build()
            .unwrap()
    }

    fn append(&self, lines: &[&str]) {
        append_lines(&self.source, lines);
    }
}

fn append_lines(path: &Path, lines: &[&str]) {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
}

/// 세 가지 규칙이 각 카테고리에 한 번씩 집계되고, 재수집은 아무것도 바꾸지 않음
#[tokio::test]
async fn test_three_rules_then_idempotent_rescrape() {
    let fx = Fixture::new();
    fx.append(&[BRUTE_FORCE, SSH_CONNECTION, UNLISTED]);

    let counters = Arc::new(AlertCounters::new());
    let mut coordinator = fx.coordinator(Arc::clone(&counters));

    coordinator.scrape().await.unwrap();
    let first = counters.snapshot();
    assert_eq!(first.ssh_brute_force, 1);
    assert_eq!(first.ssh_connection, 1);
    assert_eq!(first.other, 1);
    assert_eq!(first.icmp, 0);

    let report = coordinator.scrape().await.unwrap();
    assert_eq!(report.new_alerts.total(), 0);
    assert_eq!(report.skipped_seen, 3);
    assert_eq!(counters.snapshot(), first);
}

/// 추가된 라인만 다음 패스에서 집계됨
#[tokio::test]
async fn test_appended_lines_counted_on_next_scrape() {
    let fx = Fixture::new();
    fx.append(&[BRUTE_FORCE]);

    let counters = Arc::new(AlertCounters::new());
    let mut coordinator = fx.coordinator(Arc::clone(&counters));
    coordinator.scrape().await.unwrap();

    // 타임스탬프만 다른 두 번째 ICMP 알림
    let later_icmp = ICMP.replace("12:00:04", "12:00:05");
    fx.append(&[ICMP, later_icmp.as_str()]);
    let report = coordinator.scrape().await.unwrap();
    assert_eq!(report.new_alerts.icmp, 2);
    assert_eq!(counters.get(Category::SshBruteForce), 1);
    assert_eq!(counters.get(Category::Icmp), 2);
}

/// 64 KiB를 넘는 알림 라인도 한 번 집계되고 원장에 기록됨
#[tokio::test]
async fn test_oversized_alert_line_counted_exactly_once() {
    let fx = Fixture::new();
    let long_line = format!(
        r#"{{"rule":"1:1000001:1","payload":"{}"}}"#,
        "x".repeat(70 * 1024)
    );
    fx.append(&[long_line.as_str(), ICMP]);

    let counters = Arc::new(AlertCounters::new());
    let mut coordinator = fx.coordinator(Arc::clone(&counters));
    for _ in 0..3 {
        coordinator.scrape().await.unwrap();
    }

    assert_eq!(counters.get(Category::SshBruteForce), 1);
    assert_eq!(counters.get(Category::Icmp), 1);
    let ledger = std::fs::read_to_string(&fx.ledger).unwrap();
    assert!(ledger.lines().any(|l| l == long_line));
}

/// 잘린 마지막 라인은 건너뛰고, 완성된 뒤 한 번만 집계됨
#[tokio::test]
async fn test_truncated_line_counted_once_fixed() {
    let fx = Fixture::new();
    let partial = &ICMP[..ICMP.len() / 2];
    std::fs::write(&fx.source, format!("{}\n{}", BRUTE_FORCE, partial)).unwrap();

    let counters = Arc::new(AlertCounters::new());
    let mut coordinator = fx.coordinator(Arc::clone(&counters));

    let report = coordinator.scrape().await.unwrap();
    assert_eq!(report.skipped_malformed, 1);
    assert_eq!(counters.get(Category::Icmp), 0);
    let ledger = std::fs::read_to_string(&fx.ledger).unwrap();
    assert!(!ledger.contains(partial));

    // 센서가 나머지 부분을 기록함
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(&fx.source)
        .unwrap();
    writeln!(file, "{}", &ICMP[ICMP.len() / 2..]).unwrap();

    coordinator.scrape().await.unwrap();
    coordinator.scrape().await.unwrap();
    assert_eq!(counters.get(Category::Icmp), 1);
    assert_eq!(counters.get(Category::SshBruteForce), 1);
}

/// 재시작 후 같은 파일을 다시 읽어도 아무것도 집계되지 않음
#[tokio::test]
async fn test_restart_durability() {
    let fx = Fixture::new();
    fx.append(&[BRUTE_FORCE, SSH_CONNECTION, ICMP, UNLISTED]);

    {
        let mut coordinator = fx.coordinator(Arc::new(AlertCounters::new()));
        let report = coordinator.scrape().await.unwrap();
        assert_eq!(report.committed, 4);
    }

    let counters = Arc::new(AlertCounters::new());
    let mut restarted = fx.coordinator(Arc::clone(&counters));
    let report = restarted.scrape().await.unwrap();
    assert_eq!(report.new_alerts.total(), 0);
    assert_eq!(report.skipped_seen, 4);
    assert_eq!(counters.snapshot().total(), 0);
}

/// 소스가 없으면 패스가 중단되고 카운터는 이전 값을 유지함
#[tokio::test]
async fn test_missing_source_keeps_last_known_counts() {
    let fx = Fixture::new();
    fx.append(&[BRUTE_FORCE]);

    let counters = Arc::new(AlertCounters::new());
    let mut coordinator = fx.coordinator(Arc::clone(&counters));
    coordinator.scrape().await.unwrap();

    std::fs::remove_file(&fx.source).unwrap();
    let err = coordinator.scrape().await.unwrap_err();
    assert!(matches!(err, AlertPipelineError::SourceUnavailable { .. }));
    assert!(!err.is_line_level());
    assert_eq!(counters.get(Category::SshBruteForce), 1);
    assert!(!coordinator.health().is_healthy());
}

/// 기록 도중 잘린 원장 꼬리 뒤에도 새 항목이 별도 라인으로 기록됨
#[tokio::test]
async fn test_torn_ledger_tail() {
    let fx = Fixture::new();
    // 원장 마지막 항목이 개행 없이 끝남
    std::fs::write(&fx.ledger, BRUTE_FORCE).unwrap();
    fx.append(&[BRUTE_FORCE, ICMP]);

    let counters = Arc::new(AlertCounters::new());
    let mut coordinator = fx.coordinator(Arc::clone(&counters));
    let report = coordinator.scrape().await.unwrap();
    assert_eq!(report.skipped_seen, 1);
    assert_eq!(counters.get(Category::Icmp), 1);

    let ledger = std::fs::read_to_string(&fx.ledger).unwrap();
    assert_eq!(ledger, format!("{}\n{}\n", BRUTE_FORCE, ICMP));
}

/// dry-run은 원장 파일을 만들지 않고, 실제 원장도 건드리지 않음
#[tokio::test]
async fn test_dry_run_leaves_ledger_untouched() {
    let fx = Fixture::new();
    fx.append(&[SSH_CONNECTION]);

    let mut dry = ScrapeCoordinatorBuilder::new()
        .config(fx.config())
        .dry_run(true)
        .build()
        .unwrap();
    let report = dry.scrape().await.unwrap();
    assert_eq!(report.new_alerts.ssh_connection, 1);
    assert!(!fx.ledger.exists());

    // 실제 수집은 여전히 새 알림으로 집계
    let mut real = fx.coordinator(Arc::new(AlertCounters::new()));
    let report = real.scrape().await.unwrap();
    assert_eq!(report.new_alerts.ssh_connection, 1);
}

/// 레코더에 등록된 카운터가 Prometheus 텍스트 형식으로 노출됨
#[tokio::test]
async fn test_prometheus_exposition() {
    let fx = Fixture::new();
    fx.append(&[BRUTE_FORCE, ICMP, UNLISTED]);

    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let counters = Arc::new(AlertCounters::with_recorder(&recorder, "snort"));
    let mut coordinator = fx.coordinator(Arc::clone(&counters));

    coordinator.scrape().await.unwrap();
    let body = handle.render();

    assert!(body.contains("snort_ssh_brute_force_total 1"), "{}", body);
    assert!(body.contains("snort_icmp_alerts_total 1"), "{}", body);
    assert!(body.contains("snort_other_alerts_total 1"), "{}", body);
    assert!(body.contains("snort_ssh_total 0"), "{}", body);
    assert!(body.contains("# HELP snort_ssh_brute_force_total Total number of SSH brute force alerts detected by Snort"));
    assert!(body.contains("# TYPE snort_ssh_total counter"));
}

/// 여러 레코더 인스턴스는 서로 독립적임
#[test]
fn test_counters_are_isolated_per_recorder() {
    let first = PrometheusBuilder::new().build_recorder();
    let second = PrometheusBuilder::new().build_recorder();
    let a = AlertCounters::with_recorder(&first, "snort");
    let b = AlertCounters::with_recorder(&second, "snort");

    a.increment(Category::Other);
    assert_eq!(a.get(Category::Other), 1);
    assert_eq!(b.get(Category::Other), 0);
    assert!(second.handle().render().contains("snort_other_alerts_total 0"));
}

/// 동시에 들어온 트리거는 직렬화되어 같은 라인을 두 번 세지 않음
#[tokio::test]
async fn test_serialized_concurrent_scrapes() {
    let fx = Fixture::new();
    fx.append(&[BRUTE_FORCE, SSH_CONNECTION, ICMP]);

    let counters = Arc::new(AlertCounters::new());
    let coordinator = Arc::new(tokio::sync::Mutex::new(fx.coordinator(Arc::clone(&counters))));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.lock().await.scrape().await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(counters.snapshot().total(), 3);
}

fn rule_for(kind: usize) -> &'static str {
    match kind {
        0 => "1:1000001:1",
        1 => "1:1000002:1",
        2 => "1:1000004:1",
        _ => "1:1000099:9",
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// 라인이 어떤 순서로 나뉘어 도착하든 서로 다른 라인은 정확히 한 번씩 집계됨
    #[test]
    fn prop_exactly_once_across_scrapes(
        entries in prop::collection::vec((0usize..5, 0u32..16), 1..40),
        split in 0usize..40,
    ) {
        let fx = Fixture::new();
        let lines: Vec<String> = entries
            .iter()
            .map(|(kind, seq)| {
                if *kind == 4 {
                    format!(r#"{{"rule":"1:1000001:1","seq":{}"#, seq)
                } else {
                    format!(r#"{{"rule":"{}","seq":{}}}"#, rule_for(*kind), seq)
                }
            })
            .collect();

        let mut expected = [0u64; Category::COUNT];
        let mut distinct = HashSet::new();
        for ((kind, _), line) in entries.iter().zip(&lines) {
            if *kind != 4 && distinct.insert(line.clone()) {
                expected[classify(rule_for(*kind)).index()] += 1;
            }
        }

        let split = split.min(lines.len());
        let (head, tail) = lines.split_at(split);
        let head: Vec<&str> = head.iter().map(String::as_str).collect();
        let tail: Vec<&str> = tail.iter().map(String::as_str).collect();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let counters = Arc::new(AlertCounters::new());

        runtime.block_on(async {
            std::fs::write(&fx.source, "").unwrap();
            append_lines(&fx.source, &head);
            let mut coordinator = fx.coordinator(Arc::clone(&counters));
            coordinator.scrape().await.unwrap();

            append_lines(&fx.source, &tail);
            coordinator.scrape().await.unwrap();

            // 재시작한 코디네이터도 다시 세지 않음
            let mut restarted = fx.coordinator(Arc::clone(&counters));
            restarted.scrape().await.unwrap();
        });

        for category in Category::ALL {
            prop_assert_eq!(counters.get(category), expected[category.index()]);
        }
    }
}
