//! Fuzz target for version selector parsing.
//!
//! Arbitrary text must parse into a supported tag or an error, never panic,
//! and accepted tags must round-trip through their entry point cascade.

#![no_main]

use gll::{cascade, VersionTag};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(tag) = text.parse::<VersionTag>() {
        assert!(tag.version().is_supported());
        assert!(cascade(tag).count() > 0);
    }
});
