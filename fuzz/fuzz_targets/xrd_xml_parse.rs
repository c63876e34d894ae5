//! Fuzz target for XRD XML parsing.
//!
//! Anything that parses must also render, and the rendered document must
//! parse again.

#![no_main]

use libfuzzer_sys::fuzz_target;
use xrd::ir::io_xrd_xml::{from_xrd_slice, from_xrd_str, to_xrd_string};

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid excessive memory usage.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(xrd) = from_xrd_slice(data) else {
        return;
    };
    let xml = to_xrd_string(&xrd).expect("parsed document renders");
    let _ = from_xrd_str(&xml).expect("rendered document parses");
});
