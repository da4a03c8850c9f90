//! Sequence tape
//!
//! Concatenates many symbol sequences into one addressable array:
//!
//! ```text
//! a0 a1 a2 | b0 b1 | c0 c1 c2 c3 | $
//! ```
//!
//! Each sequence is followed by one [`BARRIER`] and the tape ends with one
//! [`SENTINEL`]. Two parallel arrays map every tape position back to its
//! sequence and offset; barrier and sentinel positions map to [`VOID`].

use crate::error::{MatchError, Result};
use crate::model::{Symbol, SymbolSequence};
use std::borrow::Borrow;

/// Terminates the tape. Sorts below every barrier
pub const SENTINEL: Symbol = 0;

/// Follows each sequence on the tape
pub const BARRIER: Symbol = 1;

/// Owner and offset of barrier and sentinel positions
pub const VOID: u32 = u32::MAX;

/// Flattened multi-sequence tape, read-only once built
#[derive(Debug, Clone)]
pub struct SequenceTape<'t> {
    texts: Vec<&'t SymbolSequence>,
    symbols: Vec<Symbol>,
    owners: Vec<u32>,
    offsets: Vec<u32>,
    /// Largest symbol on the tape, never below [`BARRIER`]
    maximum: Symbol,
}

impl<'t> SequenceTape<'t> {
    /// Lay out `texts` in order on a new tape
    pub fn new<T: Borrow<SymbolSequence>>(texts: &'t [T]) -> Result<Self> {
        if texts.len() >= VOID as usize {
            return Err(MatchError::TooManyTexts(texts.len()));
        }

        let total = total_symbols(texts);
        if total > VOID as usize {
            return Err(MatchError::SequenceTooLong(total));
        }

        let mut tape = Self {
            texts: texts.iter().map(|t| t.borrow()).collect(),
            symbols: Vec::with_capacity(total),
            owners: Vec::with_capacity(total),
            offsets: Vec::with_capacity(total),
            maximum: BARRIER,
        };

        for (itext, text) in texts.iter().enumerate() {
            let symbols = text.borrow().symbols();
            tape.symbols.extend_from_slice(symbols);
            tape.owners.extend(std::iter::repeat_n(itext as u32, symbols.len()));
            tape.offsets.extend(0..symbols.len() as u32);
            if let Some(&max) = symbols.iter().max() {
                tape.maximum = tape.maximum.max(max);
            }

            tape.push_void(BARRIER);
        }
        tape.push_void(SENTINEL);

        debug_assert_eq!(tape.symbols.len(), total);
        Ok(tape)
    }

    fn push_void(&mut self, symbol: Symbol) {
        self.symbols.push(symbol);
        self.owners.push(VOID);
        self.offsets.push(VOID);
    }

    /// Tape length, barriers and sentinel included
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false: the sentinel is present even on an empty tape
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn text_count(&self) -> usize {
        self.texts.len()
    }

    pub fn text(&self, itext: usize) -> &'t SymbolSequence {
        self.texts[itext]
    }

    pub fn texts(&self) -> &[&'t SymbolSequence] {
        &self.texts
    }

    #[inline]
    pub fn symbol(&self, pos: usize) -> Symbol {
        self.symbols[pos]
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Index of the sequence owning `pos`, `None` at a barrier or the sentinel
    pub fn owner(&self, pos: usize) -> Option<usize> {
        match self.owners[pos] {
            VOID => None,
            owner => Some(owner as usize),
        }
    }

    /// Offset of `pos` inside its sequence, `None` at a barrier or the sentinel
    pub fn offset(&self, pos: usize) -> Option<usize> {
        match self.offsets[pos] {
            VOID => None,
            offset => Some(offset as usize),
        }
    }

    /// Raw owner, [`VOID`] for barrier and sentinel positions
    #[inline]
    pub(crate) fn raw_owner(&self, pos: usize) -> u32 {
        self.owners[pos]
    }

    #[inline]
    pub(crate) fn raw_offset(&self, pos: usize) -> u32 {
        self.offsets[pos]
    }

    pub fn maximum(&self) -> Symbol {
        self.maximum
    }

    /// Whether `width` positions from `pos` stay inside one sequence
    #[inline]
    pub fn window_in_one_text(&self, pos: usize, width: usize) -> bool {
        let owner = self.owners[pos];
        owner != VOID && width > 0 && self.owners.get(pos + width - 1) == Some(&owner)
    }
}

/// Tape length for `texts`: symbols plus one barrier each plus the sentinel
pub fn total_symbols<T: Borrow<SymbolSequence>>(texts: &[T]) -> usize {
    texts.iter().map(|t| t.borrow().len() + 1).sum::<usize>() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_text(id: &str) -> SymbolSequence {
        SymbolSequence::new(id, (0..17).map(|i| i * 3 + 2).collect())
    }

    #[test]
    fn test_empty_tape() {
        let texts: [SymbolSequence; 0] = [];
        let tape = SequenceTape::new(&texts).unwrap();

        assert_eq!(tape.text_count(), 0);
        assert_eq!(tape.len(), 1);
        assert!(!tape.is_empty());
        assert_eq!(tape.symbol(0), SENTINEL);
        assert_eq!(tape.owner(0), None);
        assert_eq!(tape.offset(0), None);
        assert_eq!(tape.maximum(), BARRIER);
    }

    #[test]
    fn test_empty_sequence_gets_barrier() {
        let texts = [SymbolSequence::empty()];
        let tape = SequenceTape::new(&texts).unwrap();
        assert_eq!(tape.len(), 2);
        assert_eq!(tape.symbols(), &[BARRIER, SENTINEL]);
    }

    #[test]
    fn test_small_tape() {
        let texts = [make_text("one"), make_text("two")];
        let tape = SequenceTape::new(&texts).unwrap();
        let n = tape.len();

        assert_eq!(tape.text_count(), 2);
        assert_eq!(n, texts[0].len() + texts[1].len() + 3);

        assert_eq!(tape.symbol(n - 1), SENTINEL);
        assert_eq!(tape.owner(n - 1), None);
        assert_eq!(tape.offset(n - 1), None);

        let barrier = texts[0].len();
        assert_eq!(tape.symbol(barrier), BARRIER);
        assert_eq!(tape.owner(barrier), None);
        assert_eq!(tape.offset(barrier), None);

        assert_eq!(tape.owner(0), Some(0));
        assert_eq!(tape.owner(n - 3), Some(1));
        assert_eq!(tape.offset(barrier + 1), Some(0));
        assert_eq!(tape.symbol(barrier + 2), texts[1].symbol(1));
        assert_eq!(tape.text(1).id(), "two");
        assert_eq!(tape.maximum(), 16 * 3 + 2);
    }

    #[test]
    fn test_window_in_one_text() {
        let texts = [make_text("one"), make_text("two")];
        let tape = SequenceTape::new(&texts).unwrap();

        assert!(tape.window_in_one_text(0, 17));
        assert!(!tape.window_in_one_text(0, 18));
        assert!(!tape.window_in_one_text(16, 3));
        assert!(!tape.window_in_one_text(17, 1));
        assert!(tape.window_in_one_text(18, 17));
        assert!(!tape.window_in_one_text(tape.len() - 1, 1));
    }

    #[test]
    fn test_maximum_never_below_barrier() {
        let texts = [SymbolSequence::new("zeros", vec![0, 0, 0])];
        let tape = SequenceTape::new(&texts).unwrap();
        assert_eq!(tape.maximum(), BARRIER);
    }
}
