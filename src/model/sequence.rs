//! Symbol sequences: identity, symbols and optional character spans.

use crate::error::{MatchError, Result};
use crate::utils::hash_symbols;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

/// A symbol is an opaque non-negative code assigned by an upstream lexer
pub type Symbol = u32;

static EMPTY: LazyLock<SymbolSequence> = LazyLock::new(|| SymbolSequence::new("null", Vec::new()));

/// Immutable sequence of symbols with an identity string.
///
/// Equality, ordering and hashing use the identity only, never the content.
/// Character spans are optional; when present there is exactly one
/// `(offset, length)` per symbol and the spans never overlap.
#[derive(Clone)]
pub struct SymbolSequence {
    id: String,
    symbols: Vec<Symbol>,
    offsets: Vec<u32>,
    lengths: Vec<u8>,
    meta: Vec<u8>,
}

impl SymbolSequence {
    /// Create a sequence without character spans
    pub fn new(id: impl Into<String>, symbols: Vec<Symbol>) -> Self {
        Self {
            id: id.into(),
            symbols,
            offsets: Vec::new(),
            lengths: Vec::new(),
            meta: Vec::new(),
        }
    }

    /// Create a sequence with per-symbol character spans and metadata.
    ///
    /// Pass empty `offsets` and `lengths` for a span-free sequence.
    pub fn with_spans(
        id: impl Into<String>,
        symbols: Vec<Symbol>,
        offsets: Vec<u32>,
        lengths: Vec<u8>,
        meta: Vec<u8>,
    ) -> Result<Self> {
        validate_spans(symbols.len(), &offsets, &lengths)?;

        Ok(Self {
            id: id.into(),
            symbols,
            offsets,
            lengths,
            meta,
        })
    }

    /// Assemble a sequence whose spans were already validated while appending
    pub(crate) fn from_parts(
        id: String,
        symbols: Vec<Symbol>,
        offsets: Vec<u32>,
        lengths: Vec<u8>,
        meta: Vec<u8>,
    ) -> Self {
        debug_assert!(validate_spans(symbols.len(), &offsets, &lengths).is_ok());
        Self {
            id,
            symbols,
            offsets,
            lengths,
            meta,
        }
    }

    /// Shared empty sequence
    pub fn empty() -> &'static SymbolSequence {
        &EMPTY
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[inline]
    pub fn symbol(&self, i: usize) -> Symbol {
        self.symbols[i]
    }

    #[inline]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn has_spans(&self) -> bool {
        !self.offsets.is_empty()
    }

    /// Character offset of symbol `i`. Panics if the sequence has no spans
    pub fn offset(&self, i: usize) -> u32 {
        self.offsets[i]
    }

    /// Character length of symbol `i`. Panics if the sequence has no spans
    pub fn length(&self, i: usize) -> u8 {
        self.lengths[i]
    }

    pub fn min_char(&self, i: usize) -> u32 {
        self.offset(i)
    }

    pub fn max_char(&self, i: usize) -> u32 {
        self.offset(i) + u32::from(self.length(i))
    }

    pub fn meta(&self) -> &[u8] {
        &self.meta
    }

    /// Hash of the contiguous run `start..start + len`
    pub fn window_hash(&self, start: usize, len: usize) -> u32 {
        hash_symbols(&self.symbols[start..start + len])
    }
}

fn validate_spans(size: usize, offsets: &[u32], lengths: &[u8]) -> Result<()> {
    if offsets.len() != lengths.len() {
        return Err(MatchError::InvalidSpan(format!(
            "{} offsets but {} lengths",
            offsets.len(),
            lengths.len()
        )));
    }
    if !offsets.is_empty() && offsets.len() != size {
        return Err(MatchError::InvalidSpan(format!(
            "{} spans for {} symbols",
            offsets.len(),
            size
        )));
    }
    if let Some(i) = lengths.iter().position(|&l| l == 0) {
        return Err(MatchError::InvalidSpan(format!("span {} has zero length", i)));
    }
    for (i, (&offset, &length)) in offsets.iter().zip(lengths).enumerate() {
        if offset.checked_add(u32::from(length)).is_none() {
            return Err(MatchError::InvalidSpan(format!(
                "span {} at {} overflows the offset range",
                i, offset
            )));
        }
    }
    for i in 1..offsets.len() {
        let end = u64::from(offsets[i - 1]) + u64::from(lengths[i - 1]);
        if end > u64::from(offsets[i]) {
            return Err(MatchError::InvalidSpan(format!(
                "span {} ends at {} after span {} starts at {}",
                i - 1,
                end,
                i,
                offsets[i]
            )));
        }
    }
    Ok(())
}

impl PartialEq for SymbolSequence {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SymbolSequence {}

impl Hash for SymbolSequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for SymbolSequence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SymbolSequence {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for SymbolSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl fmt::Debug for SymbolSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolSequence")
            .field("id", &self.id)
            .field("len", &self.symbols.len())
            .field("spans", &self.has_spans())
            .finish()
    }
}
