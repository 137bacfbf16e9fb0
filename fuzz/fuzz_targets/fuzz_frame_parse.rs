//! Fuzz target for device frame parsing.
//!
//! Tests that JSON frame parsing handles arbitrary input without
//! panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use fw_common::Frame;

fuzz_target!(|data: &[u8]| {
    // Should never panic, only return an error
    let _ = serde_json::from_slice::<Frame>(data);
});
