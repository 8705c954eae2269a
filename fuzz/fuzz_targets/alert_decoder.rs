#![no_main]

use libfuzzer_sys::fuzz_target;
use snortwatch_alert_pipeline::{AlertDecoder, classify};

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        let decoder = AlertDecoder::new();
        if let Ok(record) = decoder.decode(line) {
            let _ = classify(record.rule());
        }
    }
});
