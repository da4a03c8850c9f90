//! Tape-based matching
//!
//! All sequences are laid out on one [`SequenceTape`], separated by
//! barriers. The [`RadixMatcher`] then groups tape suffixes that agree on
//! their first `depth` symbols without hashing anything.
//!
//! ## Architecture
//!
//! - `tape`: flattened multi-sequence tape with owner and offset maps
//! - `radix`: depth-bounded MSD radix sort reporting fixed-depth matches

pub mod radix;
pub mod tape;

// Re-exports for convenience
pub use radix::RadixMatcher;
pub use tape::{BARRIER, SENTINEL, SequenceTape, VOID};
