//! 규칙 분류기 -- 규칙 식별자를 알림 카테고리로 매핑합니다.
//!
//! 매핑은 [`RULE_TABLE`] 하나로만 정의됩니다. 새 규칙은 테이블에 항목을
//! 추가하는 것으로 끝나며, 테이블에 없는 모든 식별자는 [`Category::Other`]입니다.
//!
//! `1:1000003:3`은 SSH 연결 규칙의 개정판으로 보고 [`Category::SshConnection`]에 포함합니다.

use std::fmt;

use serde::Serialize;
use snortwatch_core::metrics;

/// 알림 카테고리
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// SSH 무차별 대입 시도
    SshBruteForce,
    /// SSH 연결 감지
    SshConnection,
    /// ICMP 트래픽
    Icmp,
    /// 그 밖의 모든 규칙 (`unknown` 포함)
    Other,
}

impl Category {
    /// 카테고리 개수
    pub const COUNT: usize = 4;

    /// 모든 카테고리 (노출 순서)
    pub const ALL: [Category; Category::COUNT] = [
        Category::SshBruteForce,
        Category::SshConnection,
        Category::Icmp,
        Category::Other,
    ];

    /// 배열 인덱스 (`ALL`에서의 위치)
    pub const fn index(self) -> usize {
        match self {
            Category::SshBruteForce => 0,
            Category::SshConnection => 1,
            Category::Icmp => 2,
            Category::Other => 3,
        }
    }

    /// 사람이 읽는 레이블
    pub const fn label(self) -> &'static str {
        match self {
            Category::SshBruteForce => "ssh_brute_force",
            Category::SshConnection => "ssh_connection",
            Category::Icmp => "icmp",
            Category::Other => "other",
        }
    }

    /// 네임스페이스를 뺀 Prometheus 카운터 이름
    pub const fn metric_suffix(self) -> &'static str {
        match self {
            Category::SshBruteForce => metrics::SSH_BRUTE_FORCE_TOTAL,
            Category::SshConnection => metrics::SSH_TOTAL,
            Category::Icmp => metrics::ICMP_ALERTS_TOTAL,
            Category::Other => metrics::OTHER_ALERTS_TOTAL,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 규칙 식별자 → 카테고리 매핑 테이블
///
/// 위에서부터 정확히 일치하는 첫 항목이 선택됩니다.
pub const RULE_TABLE: &[(&str, Category)] = &[
    ("1:1000001:1", Category::SshBruteForce),
    ("1:1000002:1", Category::SshConnection),
    ("1:1000003:3", Category::SshConnection),
    ("1:1000004:1", Category::Icmp),
];

/// 규칙 식별자를 카테고리로 분류합니다.
///
/// 실패하지 않습니다. 테이블에 없으면 [`Category::Other`]를 반환합니다.
pub fn classify(rule: &str) -> Category {
    RULE_TABLE
        .iter()
        .find(|(id, _)| *id == rule)
        .map(|(_, category)| *category)
        .unwrap_or(Category::Other)
}
