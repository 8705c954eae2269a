//! 메트릭 이름 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름과 설명(HELP 텍스트)을 중앙에서 정의합니다.
//! 이름 접두어(namespace)는 설정으로 바꿀 수 있으므로, 여기서는 접두어를 뺀
//! 접미어만 상수로 두고 [`metric_name`]으로 완성합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `metrics.namespace` 설정값 (기본 `snort`)
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use snortwatch_core::metrics;
//!
//! let name = metrics::metric_name("snort", metrics::SSH_TOTAL);
//! assert_eq!(name, "snort_ssh_total");
//! ```

// ─── 알림 카운터 접미어 ──────────────────────────────────────────────

/// SSH 무차별 대입 알림 수 (counter)
pub const SSH_BRUTE_FORCE_TOTAL: &str = "ssh_brute_force_total";

/// SSH 연결 알림 수 (counter)
pub const SSH_TOTAL: &str = "ssh_total";

/// ICMP 알림 수 (counter)
pub const ICMP_ALERTS_TOTAL: &str = "icmp_alerts_total";

/// 그 밖의 알림 수 (counter)
pub const OTHER_ALERTS_TOTAL: &str = "other_alerts_total";

/// 알림 카운터 접미어와 HELP 텍스트 목록
///
/// 노출 순서와 설명 문구는 수집기 쪽 대시보드가 의존하므로 바꾸지 않습니다.
pub const ALERT_COUNTERS: [(&str, &str); 4] = [
    (
        SSH_BRUTE_FORCE_TOTAL,
        "Total number of SSH brute force alerts detected by Snort",
    ),
    (SSH_TOTAL, "Total number of ssh alerts detected by Snort"),
    (
        ICMP_ALERTS_TOTAL,
        "Total number of ICMP alerts detected by Snort",
    ),
    (
        OTHER_ALERTS_TOTAL,
        "Total number of other alerts detected by Snort",
    ),
];

/// 접두어와 접미어를 이어 전체 메트릭 이름을 만듭니다.
pub fn metric_name(namespace: &str, suffix: &str) -> String {
    format!("{}_{}", namespace, suffix)
}

/// 접미어에 해당하는 HELP 텍스트를 반환합니다.
pub fn help_text(suffix: &str) -> Option<&'static str> {
    ALERT_COUNTERS
        .iter()
        .find(|(s, _)| *s == suffix)
        .map(|(_, help)| *help)
}

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 알림 카운터의 설명(description)을 현재 레코더에 등록합니다.
///
/// `metrics::describe_counter!()`를 호출하므로, 전역 레코더 또는
/// `metrics::with_local_recorder` 범위 안에서 호출해야 효과가 있습니다.
pub fn describe_all(namespace: &str) {
    use metrics::describe_counter;

    for (suffix, help) in ALERT_COUNTERS {
        describe_counter!(metric_name(namespace, suffix), help);
    }
}
