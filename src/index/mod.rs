//! Matching engines
//!
//! - [`exact`] / [`stencils`]: online hash indices, one text at a time
//! - [`sharded`]: two-phase multi-threaded stencil matcher for a whole corpus
//! - [`suffix_array`]: tape and radix matcher, no hashing
//! - [`slow`]: brute-force reference
//!
//! Every engine reports through [`MatchVisitor`](crate::visitor::MatchVisitor).

pub mod bins;
pub mod exact;
pub mod sharded;
pub mod slow;
pub mod stencil;
pub mod stencils;
pub mod suffix_array;

pub use exact::ExactIndex;
pub use sharded::{Phase, ShardedConfig, ShardedMatcher, ShardedStats};
pub use stencil::StencilModel;
pub use stencils::StencilIndex;
pub use suffix_array::{RadixMatcher, SequenceTape};
