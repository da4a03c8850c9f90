//! # lemmatch - shared-subsequence matching
//!
//! lemmatch finds runs of symbols that two different sequences have in
//! common. Sequences are produced by an upstream lexer: each symbol is an
//! opaque `u32` code, optionally carrying the character span it was read
//! from.
//!
//! ## Architecture
//!
//! - [`model`] - symbol sequences, the append-only builder, identity codes
//! - [`index`] - the matching engines
//! - [`visitor`] - the callback every engine reports matches through
//! - [`corpus`], [`output`], [`logging`] - support for the `lemmatch` binary
//! - [`utils`] - symbol hashing, configuration, progress display
//!
//! ## Engines
//!
//! | Engine | Matches | Reports |
//! |--------|---------|---------|
//! | [`ExactIndex`] | equal runs of a fixed length | `(query, indexed)` |
//! | [`StencilIndex`] | equal samples under gapped patterns | `(query, indexed)` |
//! | [`ShardedMatcher`] | stencil matches over a whole corpus, in parallel | both directions |
//! | [`RadixMatcher`] | equal runs of a fixed depth over a whole corpus | once, lower text first |
//! | [`index::slow`] | same as the radix matcher, brute force | once, lower text first |
//!
//! ## Quick Start
//!
//! ```
//! use lemmatch::{CollectVisitor, ExactIndex, SymbolSequence};
//!
//! let a = SymbolSequence::new("a", vec![3, 1, 4, 1, 5, 9]);
//! let b = SymbolSequence::new("b", vec![2, 7, 1, 4, 1, 5]);
//!
//! let mut index = ExactIndex::new(4).unwrap();
//! index.add(&b).unwrap();
//!
//! let matches = CollectVisitor::new();
//! index.search(&a, &matches);
//!
//! let records = matches.into_records();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].to_string(), "a:1+4  b:2+4");
//! ```

pub mod corpus;
pub mod error;
pub mod index;
pub mod logging;
pub mod model;
pub mod output;
pub mod utils;
pub mod visitor;

pub use error::{MatchError, Result};
pub use index::{
    ExactIndex, Phase, RadixMatcher, SequenceTape, ShardedConfig, ShardedMatcher, ShardedStats,
    StencilIndex, StencilModel,
};
pub use model::{SequenceBuilder, Symbol, SymbolSequence};
pub use visitor::{
    CollectVisitor, CountVisitor, InvertVisitor, Match, MatchRecord, MatchSet, MatchVisitor, Side,
};
