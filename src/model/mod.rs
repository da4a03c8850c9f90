//! Symbol sequences: the immutable input every engine consumes.
//!
//! - [`sequence`] - `SymbolSequence` and the `Symbol` code type
//! - [`builder`] - append-only `SequenceBuilder` with span checks
//! - [`identity`] - content-derived identity codes

pub mod builder;
pub mod identity;
pub mod sequence;

pub use builder::SequenceBuilder;
pub use identity::{content_code, symbols_code};
pub use sequence::{Symbol, SymbolSequence};
