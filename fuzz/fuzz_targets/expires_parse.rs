//! Fuzz target for `Expires` timestamps.

#![no_main]

use libfuzzer_sys::fuzz_target;
use xrd::ir::fuzz_expires_roundtrip;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = fuzz_expires_roundtrip(text);
    }
});
