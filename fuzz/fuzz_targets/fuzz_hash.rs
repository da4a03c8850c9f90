#![no_main]

use lemmatch::utils::{hash_premixed, hash_symbols, premix};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|symbols: Vec<u32>| {
    // The sharded matcher hashes pre-mixed values; both paths must agree
    let mixed: Vec<u32> = symbols.iter().map(|&s| premix(s)).collect();
    assert_eq!(hash_premixed(&mixed), hash_symbols(&symbols));
});
