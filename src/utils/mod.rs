//! Utility functions shared across the engines.
//!
//! ## Modules
//!
//! - [`app_data`] - Application configuration in the platform data directory
//! - [`hash`] - Order-sensitive symbol-run hashing
//! - [`progress`] - Progress spinner that compiles away without `progress`
//!
//! ```no_run
//! use lemmatch::utils::hash_symbols;
//!
//! // Same run, same bucket, in every engine
//! let h = hash_symbols(&[4, 8, 15, 16, 23, 42]);
//! ```

pub mod app_data;
pub mod hash;
pub mod progress;

pub use app_data::*;
pub use hash::*;
