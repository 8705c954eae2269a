#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use snortwatch_alert_pipeline::{AlertDecoder, Category, classify};

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    gid: u32,
    sid: u32,
    rev: u32,
    /// `rule` 필드를 숫자로 넣을지 여부
    numeric_rule: bool,
    msg: String,
}

fuzz_target!(|input: FuzzInput| {
    let rule = format!("{}:{}:{}", input.gid, input.sid, input.rev);
    let line = if input.numeric_rule {
        serde_json::json!({ "rule": input.sid, "msg": input.msg }).to_string()
    } else {
        serde_json::json!({ "rule": rule, "msg": input.msg }).to_string()
    };

    let decoder = AlertDecoder::new();
    match decoder.decode(&line) {
        Ok(record) => {
            // 숫자 rule은 unknown, 문자열 rule은 그대로 보존
            let expected = if input.numeric_rule { "unknown" } else { rule.as_str() };
            assert_eq!(record.rule(), expected);
            let category = classify(record.rule());
            assert!(Category::ALL.contains(&category));
        }
        Err(e) => panic!("well-formed object rejected: {}", e),
    }
});
