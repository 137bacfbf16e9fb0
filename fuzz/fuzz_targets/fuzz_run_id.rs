//! Fuzz target for run ID parsing.
//!
//! Tests that `RunId::parse` handles arbitrary input without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use fw_common::RunId;

fuzz_target!(|data: &str| {
    // The parser should never panic, only return None for malformed input
    let _ = RunId::parse(data);
});
