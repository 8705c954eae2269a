//! 알림 레코드 디코더
//!
//! Snort `alert_json` 출력의 한 줄을 [`AlertRecord`]로 변환합니다.
//! 소비하는 필드는 `rule` 하나뿐이며, 나머지 필드는 무시합니다.
//!
//! # 사용 예시
//! ```ignore
//! use snortwatch_alert_pipeline::decoder::AlertDecoder;
//!
//! let decoder = AlertDecoder::default();
//! let record = decoder.decode(r#"{"rule":"1:1000001:1","msg":"SSH brute force"}"#)?;
//! assert_eq!(record.rule(), "1:1000001:1");
//! ```

use crate::error::AlertPipelineError;

/// `rule` 필드가 없거나 문자열이 아닐 때 사용하는 규칙 식별자
pub const UNKNOWN_RULE: &str = "unknown";

/// 디코딩된 알림 레코드
///
/// 원본 라인 텍스트는 중복 제거 식별자로 쓰이므로 디코딩 후에도 그대로 보존합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertRecord {
    rule: String,
    raw: String,
}

impl AlertRecord {
    /// 규칙 식별자 (`gid:sid:rev` 또는 [`UNKNOWN_RULE`])
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// 디코딩 전의 원본 라인 (앞뒤 공백 제거됨)
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// 원본 라인을 소유권과 함께 꺼냅니다.
    pub fn into_raw(self) -> String {
        self.raw
    }
}

/// 알림 라인 디코더
///
/// 상태가 없으며, 같은 입력에 대해 항상 같은 결과를 반환합니다.
/// 라인 길이에는 제한이 없습니다. 완전한 JSON 객체라면 크기와 관계없이 디코딩됩니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertDecoder;

impl AlertDecoder {
    /// 디코더를 생성합니다.
    pub fn new() -> Self {
        Self
    }

    /// 라인 하나를 디코딩합니다.
    ///
    /// 입력은 앞뒤 공백이 제거된 라인이어야 합니다. 유효한 JSON이 아니거나
    /// 최상위가 객체가 아니면 [`AlertPipelineError::MalformedLine`]을 반환합니다.
    pub fn decode(&self, line: &str) -> Result<AlertRecord, AlertPipelineError> {
        let value: serde_json::Value =
            serde_json::from_str(line).map_err(|e| AlertPipelineError::MalformedLine {
                column: e.column(),
                reason: e.to_string(),
            })?;

        // 최상위가 JSON 객체여야 합니다
        let object = value
            .as_object()
            .ok_or_else(|| AlertPipelineError::MalformedLine {
                column: 0,
                reason: "expected JSON object at top level".to_owned(),
            })?;

        let rule = match object.get("rule") {
            Some(serde_json::Value::String(rule)) => rule.clone(),
            _ => UNKNOWN_RULE.to_owned(),
        };

        Ok(AlertRecord {
            rule,
            raw: line.to_owned(),
        })
    }
}
