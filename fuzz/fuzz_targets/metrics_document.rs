#![no_main]

use libfuzzer_sys::fuzz_target;
use xgotop_validate::event_counts::extract_str;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = extract_str(input);
    }
});
