//! Append-only builder for [`SymbolSequence`].

use super::identity::symbols_code;
use super::sequence::{Symbol, SymbolSequence};
use crate::error::{MatchError, Result};

/// Initial capacity reserved for a builder
pub const START_CAPACITY: usize = 8192;

/// Accumulates symbols with their character spans, in reading order.
///
/// Each span must start at or after the end of the previous one. The builder
/// can be reset and reused; `finish` copies the accumulated data out.
#[derive(Debug, Clone)]
pub struct SequenceBuilder {
    symbols: Vec<Symbol>,
    offsets: Vec<u32>,
    lengths: Vec<u8>,
    /// End of the last span appended
    last_end: u32,
}

impl SequenceBuilder {
    pub fn new() -> Self {
        Self::with_capacity(START_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            symbols: Vec::with_capacity(capacity),
            offsets: Vec::with_capacity(capacity),
            lengths: Vec::with_capacity(capacity),
            last_end: 0,
        }
    }

    /// Number of symbols appended since the last reset
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Append a symbol covering `length` characters from `offset`
    pub fn add(&mut self, symbol: Symbol, offset: u32, length: u8) -> Result<()> {
        if length == 0 {
            return Err(MatchError::InvalidSpan(format!(
                "symbol {} at offset {} has zero length",
                self.symbols.len(),
                offset
            )));
        }
        if offset < self.last_end {
            return Err(MatchError::InvalidSpan(format!(
                "offset {} precedes end of previous span {}",
                offset, self.last_end
            )));
        }
        let end = offset.checked_add(u32::from(length)).ok_or_else(|| {
            MatchError::InvalidSpan(format!("span at {} overflows the offset range", offset))
        })?;

        self.symbols.push(symbol);
        self.offsets.push(offset);
        self.lengths.push(length);
        self.last_end = end;
        Ok(())
    }

    /// Forget all appended symbols, keeping the allocation
    pub fn reset(&mut self) {
        self.symbols.clear();
        self.offsets.clear();
        self.lengths.clear();
        self.last_end = 0;
    }

    /// Freeze the appended symbols into a sequence named `id`
    pub fn finish(&self, id: impl Into<String>) -> SymbolSequence {
        self.finish_with_meta(id, Vec::new())
    }

    /// Freeze with opaque metadata bytes attached
    pub fn finish_with_meta(&self, id: impl Into<String>, meta: Vec<u8>) -> SymbolSequence {
        SymbolSequence::from_parts(
            id.into(),
            self.symbols.clone(),
            self.offsets.clone(),
            self.lengths.clone(),
            meta,
        )
    }

    /// Freeze with an identity derived from the symbol content
    pub fn finish_with_content_id(&self) -> SymbolSequence {
        self.finish(symbols_code(&self.symbols))
    }
}

impl Default for SequenceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let builder = SequenceBuilder::new();
        assert_eq!(builder.len(), 0);
        assert!(builder.is_empty());
    }

    #[test]
    fn test_add() {
        let mut builder = SequenceBuilder::new();
        builder.add(1, 2, 3).unwrap();
        assert_eq!(builder.len(), 1);
        builder.add(4, 5, 6).unwrap();
        assert_eq!(builder.len(), 2);
    }

    #[test]
    fn test_reset() {
        let mut builder = SequenceBuilder::new();
        builder.add(1, 2, 3).unwrap();
        builder.add(4, 5, 6).unwrap();
        builder.reset();
        assert_eq!(builder.len(), 0);

        // Offsets restart after a reset
        builder.add(7, 0, 1).unwrap();
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_finish() {
        let mut builder = SequenceBuilder::new();
        builder.add(1, 2, 3).unwrap();
        builder.add(4, 5, 6).unwrap();

        let text = builder.finish("hash1");
        assert_eq!(text.len(), 2);
        assert_eq!(text.symbol(0), 1);
        assert_eq!(text.offset(0), 2);
        assert_eq!(text.length(0), 3);
        assert_eq!(text.symbol(1), 4);
        assert_eq!(text.offset(1), 5);
        assert_eq!(text.length(1), 6);

        builder.reset();
        let empty = builder.finish("hash2");
        assert_eq!(empty.len(), 0);
        assert!(!empty.has_spans());
    }

    #[test]
    fn test_rejects_backwards_offset() {
        let mut builder = SequenceBuilder::new();
        builder.add(1, 10, 4).unwrap();
        assert!(builder.add(2, 12, 1).is_err());
        // Failed add leaves the builder untouched
        assert_eq!(builder.len(), 1);
        builder.add(2, 14, 1).unwrap();
    }

    #[test]
    fn test_rejects_zero_length() {
        let mut builder = SequenceBuilder::new();
        assert!(builder.add(1, 0, 0).is_err());
    }

    #[test]
    fn test_content_id_is_stable() {
        let mut a = SequenceBuilder::with_capacity(4);
        let mut b = SequenceBuilder::with_capacity(4);
        for (i, s) in [9, 8, 7].into_iter().enumerate() {
            a.add(s, i as u32 * 2, 1).unwrap();
            b.add(s, i as u32 * 3, 2).unwrap();
        }

        // Identity depends on symbols, not on spans
        assert_eq!(a.finish_with_content_id(), b.finish_with_content_id());
        assert_eq!(a.finish_with_content_id().id().len(), 24);
    }

    #[test]
    fn test_meta_attached() {
        let mut builder = SequenceBuilder::new();
        builder.add(1, 0, 1).unwrap();
        let text = builder.finish_with_meta("m", vec![0xAB, 0xCD]);
        assert_eq!(text.meta(), &[0xAB, 0xCD]);
    }
}
