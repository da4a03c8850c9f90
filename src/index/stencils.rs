//! Online index for gapped (stencil) matching.

use super::bins::{BinTable, StencilPosting, window_fits};
use super::stencil::StencilModel;
use crate::error::{MatchError, Result};
use crate::model::SymbolSequence;
use crate::utils::hash_symbols;
use crate::visitor::{Match, MatchVisitor, Side};

/// Hash index of every stencil sample of the added texts.
///
/// Works like [`ExactIndex`](super::exact::ExactIndex) with one posting per
/// (position, pattern) pair. Postings remember the pattern that produced
/// them, so the two sides of a match may come from different patterns and
/// report different widths.
pub struct StencilIndex<'t> {
    model: StencilModel,
    bins: BinTable<StencilPosting>,
    texts: Vec<&'t SymbolSequence>,
    /// Sample buffer reused by `add`
    buffer: Vec<u32>,
}

impl<'t> StencilIndex<'t> {
    pub fn new(model: StencilModel) -> Self {
        let size = model.size();
        Self {
            model,
            bins: BinTable::new(),
            texts: Vec::with_capacity(1024),
            buffer: vec![0; size],
        }
    }

    pub fn model(&self) -> &StencilModel {
        &self.model
    }

    pub fn text_count(&self) -> usize {
        self.texts.len()
    }

    pub fn texts(&self) -> &[&'t SymbolSequence] {
        &self.texts
    }

    pub fn posting_count(&self) -> usize {
        self.bins.len()
    }

    /// Register a text and post every pattern at every position it fits
    pub fn add(&mut self, text: &'t SymbolSequence) -> Result<()> {
        let itext = u32::try_from(self.texts.len()).map_err(|_| MatchError::TooManyTexts(self.texts.len()))?;
        if u32::try_from(text.len()).is_err() {
            return Err(MatchError::SequenceTooLong(text.len()));
        }
        self.texts.push(text);

        let symbols = text.symbols();
        for start in 0..symbols.len() {
            for stencil in 0..self.model.len() {
                if !window_fits(start, self.model.width(stencil), symbols.len()) {
                    continue;
                }

                self.model.sample(&mut self.buffer, symbols, start, stencil);
                let hash = hash_symbols(&self.buffer);
                self.bins
                    .push(hash, StencilPosting::encode(itext, start as u32, stencil as u8, hash));
            }
        }
        Ok(())
    }

    /// Report every stencil sample of `query` that also occurs in an added
    /// text, as `(query, indexed)` pairs.
    pub fn search<V>(&self, query: &SymbolSequence, visitor: &V)
    where
        V: MatchVisitor + ?Sized,
    {
        let mut buffer1 = vec![0; self.model.size()];
        let mut buffer2 = vec![0; self.model.size()];
        let ntexts = self.texts.len();
        let symbols1 = query.symbols();

        for start1 in 0..symbols1.len() {
            for stencil1 in 0..self.model.len() {
                let width1 = self.model.width(stencil1);
                if !window_fits(start1, width1, symbols1.len()) {
                    continue;
                }

                self.model.sample(&mut buffer1, symbols1, start1, stencil1);
                let hash = hash_symbols(&buffer1);
                let mut prev_text = 0;

                for posting in self.bins.bin(hash) {
                    let (itext, start2, stencil2) = posting.decode(hash);
                    if itext >= ntexts || itext < prev_text {
                        continue;
                    }

                    let text2 = self.texts[itext];
                    if text2 == query {
                        continue;
                    }

                    // The pattern byte is stored in the clear, but a posting
                    // from a colliding hash may still name any pattern.
                    if stencil2 >= self.model.len() {
                        continue;
                    }
                    let width2 = self.model.width(stencil2);
                    if !window_fits(start2, width2, text2.len()) {
                        continue;
                    }

                    self.model.sample(&mut buffer2, text2.symbols(), start2, stencil2);
                    if buffer1 != buffer2 {
                        continue;
                    }

                    visitor.matched(&Match::new(
                        Side::new(query, start1, width1),
                        Side::new(text2, start2, width2),
                    ));
                    prev_text = itext;
                }
            }
        }
    }

    /// Forget every text and posting, keeping bin allocations
    pub fn clear(&mut self) {
        self.texts.clear();
        self.bins.clear();
    }
}
