#![no_main]

use libfuzzer_sys::fuzz_target;
use xgotop_validate::SamplingRateSpec;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Accepted specs never hold a rate outside [0, 1]
        if let Ok(rates) = SamplingRateSpec::parse(input) {
            assert!(rates.check().is_ok());
        }
    }
});
