//! 파이프라인 상태 -- 수집 패스의 건강 상태 정의

use std::fmt;

use serde::Serialize;

/// 스크레이프 코디네이터의 건강 상태
///
/// 어떤 상태에서도 메트릭 엔드포인트는 마지막으로 알려진 카운터 값을 계속 응답합니다.
/// `Degraded`는 운영자의 확인이 필요하다는 신호입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum HealthStatus {
    /// 마지막 스크레이프가 정상적으로 커밋까지 완료됨
    Healthy,
    /// 마지막 스크레이프가 중단되었거나, 원장에 기록되지 못한 항목이 남아 있음
    Degraded(String),
}

impl HealthStatus {
    /// 정상 상태인지 확인합니다.
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Degraded(reason) => write!(f, "degraded: {}", reason),
        }
    }
}
