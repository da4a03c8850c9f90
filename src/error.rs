//! Error type shared by every matching engine.

use crate::index::sharded::Phase;
use thiserror::Error;

/// Errors raised by index construction and matching runs
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("match length must be positive")]
    InvalidMatchLength,

    #[error("invalid stencil model: {0}")]
    InvalidStencil(String),

    #[error("invalid character span: {0}")]
    InvalidSpan(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("index already holds {0} texts, the posting format cannot address more")]
    TooManyTexts(usize),

    #[error("sequence of {0} symbols exceeds the addressable posting range")]
    SequenceTooLong(usize),

    #[error("corpus of {symbols} symbols with {stencils} stencils exceeds the addressable link space")]
    CorpusTooLarge { symbols: usize, stencils: usize },

    #[error("{phase} worker {worker} failed: {message}")]
    WorkerFailed {
        phase: Phase,
        worker: usize,
        message: String,
    },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

pub type Result<T, E = MatchError> = std::result::Result<T, E>;
