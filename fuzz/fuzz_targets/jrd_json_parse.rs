//! Fuzz target for JRD JSON parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the JRD parser and renders
//! whatever parses, checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use xrd::ir::io_jrd_json::{from_jrd_slice, to_jrd_string};

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid excessive memory usage.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(xrd) = from_jrd_slice(data) {
        let _ = to_jrd_string(&xrd).expect("parsed document renders");
    }
});
