//! 알림 카운터 -- 카테고리별 단조 증가 카운터
//!
//! [`AlertCounters`]는 프로세스 수명 동안 감소하거나 초기화되지 않습니다.
//! 값은 두 곳에 동시에 기록됩니다.
//!
//! - 내부 원자 카운터: [`AlertCounters::snapshot`]으로 읽기 전용 조회
//! - `metrics::Counter` 핸들: 레코더(Prometheus 등)로 내보내기
//!
//! 전역 레코더를 쓰지 않고, 생성 시 주어진 레코더에만 카운터를 등록하므로
//! 테스트마다 독립된 인스턴스를 만들 수 있습니다.

use std::sync::atomic::{AtomicU64, Ordering};

use metrics::{Counter, Recorder};
use serde::Serialize;

use crate::classifier::Category;

/// 카테고리별 알림 카운터 집합
pub struct AlertCounters {
    /// 카테고리별 누적 값
    totals: [AtomicU64; Category::COUNT],
    /// 레코더에 등록된 내보내기 핸들
    exported: [Counter; Category::COUNT],
}

impl AlertCounters {
    /// 내보내기 없이 카운터를 생성합니다.
    pub fn new() -> Self {
        Self {
            totals: Default::default(),
            exported: std::array::from_fn(|_| Counter::noop()),
        }
    }

    /// 주어진 레코더에 `{namespace}_..._total` 카운터 네 개를 등록합니다.
    ///
    /// HELP 텍스트도 같은 레코더에 함께 등록되며, 값이 0이어도 등록 직후부터 노출됩니다.
    pub fn with_recorder(recorder: &dyn Recorder, namespace: &str) -> Self {
        let exported = metrics::with_local_recorder(recorder, || {
            snortwatch_core::metrics::describe_all(namespace);
            Category::ALL.map(|category| {
                metrics::counter!(snortwatch_core::metrics::metric_name(
                    namespace,
                    category.metric_suffix()
                ))
            })
        });

        Self {
            totals: Default::default(),
            exported,
        }
    }

    /// 카테고리 카운터를 1 증가시키고 증가 후 값을 반환합니다.
    pub fn increment(&self, category: Category) -> u64 {
        self.increment_by(category, 1)
    }

    /// 카테고리 카운터를 `n`만큼 증가시키고 증가 후 값을 반환합니다.
    pub fn increment_by(&self, category: Category, n: u64) -> u64 {
        let idx = category.index();
        self.exported[idx].increment(n);
        self.totals[idx].fetch_add(n, Ordering::Relaxed) + n
    }

    /// 카테고리의 현재 값을 반환합니다.
    pub fn get(&self, category: Category) -> u64 {
        self.totals[category.index()].load(Ordering::Relaxed)
    }

    /// 네 카운터의 현재 값을 한 번에 읽습니다.
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            ssh_brute_force: self.get(Category::SshBruteForce),
            ssh_connection: self.get(Category::SshConnection),
            icmp: self.get(Category::Icmp),
            other: self.get(Category::Other),
        }
    }
}

impl std::fmt::Debug for AlertCounters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertCounters")
            .field("totals", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl Default for AlertCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// 카운터 값의 읽기 전용 스냅샷 (레이블 → 값)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
    pub ssh_brute_force: u64,
    pub ssh_connection: u64,
    pub icmp: u64,
    pub other: u64,
}

impl CounterSnapshot {
    /// 카테고리의 값을 반환합니다.
    pub fn get(&self, category: Category) -> u64 {
        match category {
            Category::SshBruteForce => self.ssh_brute_force,
            Category::SshConnection => self.ssh_connection,
            Category::Icmp => self.icmp,
            Category::Other => self.other,
        }
    }

    /// 카테고리의 값을 `n`만큼 더합니다.
    pub fn add(&mut self, category: Category, n: u64) {
        let slot = match category {
            Category::SshBruteForce => &mut self.ssh_brute_force,
            Category::SshConnection => &mut self.ssh_connection,
            Category::Icmp => &mut self.icmp,
            Category::Other => &mut self.other,
        };
        *slot += n;
    }

    /// 모든 카테고리의 합
    pub fn total(&self) -> u64 {
        self.ssh_brute_force + self.ssh_connection + self.icmp + self.other
    }

    /// (레이블, 값) 쌍을 노출 순서대로 반환합니다.
    pub fn entries(&self) -> [(&'static str, u64); Category::COUNT] {
        Category::ALL.map(|category| (category.label(), self.get(category)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let counters = AlertCounters::new();
        assert_eq!(counters.snapshot(), CounterSnapshot::default());
        assert_eq!(counters.snapshot().total(), 0);
    }

    #[test]
    fn increment_returns_running_total() {
        let counters = AlertCounters::new();
        assert_eq!(counters.increment(Category::Icmp), 1);
        assert_eq!(counters.increment(Category::Icmp), 2);
        assert_eq!(counters.increment_by(Category::Icmp, 3), 5);
        assert_eq!(counters.get(Category::Icmp), 5);
        assert_eq!(counters.get(Category::Other), 0);
    }

    #[test]
    fn snapshot_reflects_each_category() {
        let counters = AlertCounters::new();
        counters.increment(Category::SshBruteForce);
        counters.increment_by(Category::SshConnection, 2);
        counters.increment_by(Category::Other, 4);

        let snap = counters.snapshot();
        assert_eq!(snap.ssh_brute_force, 1);
        assert_eq!(snap.ssh_connection, 2);
        assert_eq!(snap.icmp, 0);
        assert_eq!(snap.other, 4);
        assert_eq!(snap.total(), 7);
    }

    #[test]
    fn snapshot_add_and_entries() {
        let mut snap = CounterSnapshot::default();
        snap.add(Category::Icmp, 2);
        snap.add(Category::Other, 1);
        assert_eq!(
            snap.entries(),
            [
                ("ssh_brute_force", 0),
                ("ssh_connection", 0),
                ("icmp", 2),
                ("other", 1),
            ]
        );
    }

    #[test]
    fn counters_are_shareable_across_threads() {
        let counters = std::sync::Arc::new(AlertCounters::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let counters = std::sync::Arc::clone(&counters);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        counters.increment(Category::SshConnection);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(counters.get(Category::SshConnection), 400);
    }
}
