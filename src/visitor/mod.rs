//! The match callback contract.
//!
//! Every engine reports each discovered match by calling
//! [`MatchVisitor::matched`] once. Consumers compose by wrapping one visitor
//! in another ([`InvertVisitor`], [`CountVisitor`]) or by collecting owned
//! records ([`CollectVisitor`]).
//!
//! Visitors take `&self`: the sharded matcher invokes them from several
//! worker threads at once, so state lives behind atomics or a mutex.

pub mod collect;
pub mod compose;

pub use collect::{CollectVisitor, MatchRecord, MatchSet};
pub use compose::{CountVisitor, Discard, InvertVisitor};

use crate::model::SymbolSequence;

/// One side of a match: a window of `len` symbols starting at `offset`
#[derive(Debug, Clone, Copy)]
pub struct Side<'a> {
    pub text: &'a SymbolSequence,
    pub offset: usize,
    pub len: usize,
}

impl<'a> Side<'a> {
    pub fn new(text: &'a SymbolSequence, offset: usize, len: usize) -> Self {
        debug_assert!(offset + len <= text.len());
        Self { text, offset, len }
    }

    /// Symbols covered by this side
    pub fn symbols(&self) -> &'a [u32] {
        &self.text.symbols()[self.offset..self.offset + self.len]
    }
}

/// A match between two different texts
#[derive(Debug, Clone, Copy)]
pub struct Match<'a> {
    pub a: Side<'a>,
    pub b: Side<'a>,
}

impl<'a> Match<'a> {
    pub fn new(a: Side<'a>, b: Side<'a>) -> Self {
        Self { a, b }
    }

    /// The same match seen from the other text
    pub fn inverted(&self) -> Match<'a> {
        Match { a: self.b, b: self.a }
    }

    pub fn to_record(&self) -> MatchRecord {
        MatchRecord::from(self)
    }
}

/// Receiver of discovered matches
pub trait MatchVisitor {
    fn matched(&self, m: &Match<'_>);
}

impl<F> MatchVisitor for F
where
    F: Fn(&Match<'_>),
{
    fn matched(&self, m: &Match<'_>) {
        self(m)
    }
}
