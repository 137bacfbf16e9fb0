//! Fuzz target for frostwatch.toml parsing.
//!
//! Tests that TOML settings parsing handles arbitrary input without
//! panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use fw_config::Settings;

fuzz_target!(|data: &str| {
    let _ = toml::from_str::<Settings>(data);
});
