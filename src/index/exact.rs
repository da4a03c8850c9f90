//! Online index for exact-length symbol run matching.

use super::bins::{BinTable, RunPosting, window_fits};
use crate::error::{MatchError, Result};
use crate::model::SymbolSequence;
use crate::utils::hash_symbols;
use crate::visitor::{Match, MatchVisitor, Side};

/// Hash index of every run of `match_length` symbols in the added texts.
///
/// Texts are borrowed, never copied. Single-threaded: `add`, `search` and
/// `clear` take the index by reference and must not race.
pub struct ExactIndex<'t> {
    match_length: usize,
    bins: BinTable<RunPosting>,
    texts: Vec<&'t SymbolSequence>,
}

impl<'t> ExactIndex<'t> {
    /// Create an empty index. Fails if `match_length` is zero
    pub fn new(match_length: usize) -> Result<Self> {
        if match_length == 0 {
            return Err(MatchError::InvalidMatchLength);
        }

        Ok(Self {
            match_length,
            bins: BinTable::new(),
            texts: Vec::with_capacity(1024),
        })
    }

    pub fn match_length(&self) -> usize {
        self.match_length
    }

    /// Number of texts added since the last clear
    pub fn text_count(&self) -> usize {
        self.texts.len()
    }

    pub fn texts(&self) -> &[&'t SymbolSequence] {
        &self.texts
    }

    /// Number of postings across all bins
    pub fn posting_count(&self) -> usize {
        self.bins.len()
    }

    /// Register a text and post every run of `match_length` symbols
    pub fn add(&mut self, text: &'t SymbolSequence) -> Result<()> {
        let itext = u32::try_from(self.texts.len()).map_err(|_| MatchError::TooManyTexts(self.texts.len()))?;
        if u32::try_from(text.len()).is_err() {
            return Err(MatchError::SequenceTooLong(text.len()));
        }
        self.texts.push(text);

        let symbols = text.symbols();
        for (start, run) in symbols.windows(self.match_length).enumerate() {
            let hash = hash_symbols(run);
            self.bins.push(hash, RunPosting::encode(itext, start as u32, hash));
        }
        Ok(())
    }

    /// Report every run of `query` that also occurs in an added text.
    ///
    /// Each match is reported as `(query, indexed)`. Texts with the same
    /// identity as `query` are never reported.
    pub fn search<V>(&self, query: &SymbolSequence, visitor: &V)
    where
        V: MatchVisitor + ?Sized,
    {
        let len = self.match_length;
        let ntexts = self.texts.len();

        for (start1, run1) in query.symbols().windows(len).enumerate() {
            let hash = hash_symbols(run1);

            // Postings are appended in text order, so a real candidate never
            // decodes to a text below the last one accepted in this bin.
            let mut prev_text = 0;

            for posting in self.bins.bin(hash) {
                let (itext, start2) = posting.decode(hash);
                if itext >= ntexts || itext < prev_text {
                    continue;
                }

                let text2 = self.texts[itext];
                if text2 == query {
                    continue;
                }

                if !window_fits(start2, len, text2.len()) {
                    continue;
                }

                if run1 != &text2.symbols()[start2..start2 + len] {
                    continue;
                }

                visitor.matched(&Match::new(
                    Side::new(query, start1, len),
                    Side::new(text2, start2, len),
                ));
                prev_text = itext;
            }
        }
    }

    /// Forget every text and posting, keeping bin allocations
    pub fn clear(&mut self) {
        self.texts.clear();
        self.bins.clear();
    }
}
