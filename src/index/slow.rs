//! Brute-force reference matcher.
//!
//! Compares every window of every sequence with every window of every later
//! sequence. Quadratic in corpus size; only meant to check the other
//! engines on small inputs.

use crate::error::{MatchError, Result};
use crate::model::SymbolSequence;
use crate::visitor::{Match, MatchVisitor, Side};
use std::borrow::Borrow;

/// Report every pair of equal `depth`-long windows in two different texts.
///
/// Pairs are reported once, with the text that comes first in `texts` as
/// side `a`, the same orientation the radix matcher uses.
pub fn search<T, V>(visitor: &V, texts: &[T], depth: usize) -> Result<()>
where
    T: Borrow<SymbolSequence>,
    V: MatchVisitor + ?Sized,
{
    if depth == 0 {
        return Err(MatchError::InvalidMatchLength);
    }

    for (i1, text1) in texts.iter().enumerate() {
        let text1 = text1.borrow();
        for text2 in &texts[i1 + 1..] {
            let text2 = text2.borrow();
            if text1 == text2 || text1.len() < depth || text2.len() < depth {
                continue;
            }

            for offset1 in 0..=text1.len() - depth {
                for offset2 in 0..=text2.len() - depth {
                    search_pair(visitor, text1, text2, offset1, offset2, depth);
                }
            }
        }
    }
    Ok(())
}

/// Compare one pair of windows, reporting it if all `depth` symbols agree.
///
/// Returns whether a match was reported. Windows that do not fit are never
/// a match.
pub fn search_pair<V>(
    visitor: &V,
    text1: &SymbolSequence,
    text2: &SymbolSequence,
    offset1: usize,
    offset2: usize,
    depth: usize,
) -> bool
where
    V: MatchVisitor + ?Sized,
{
    let (Some(run1), Some(run2)) = (
        text1.symbols().get(offset1..offset1.saturating_add(depth)),
        text2.symbols().get(offset2..offset2.saturating_add(depth)),
    ) else {
        return false;
    };
    if run1 != run2 {
        return false;
    }

    visitor.matched(&Match::new(
        Side::new(text1, offset1, depth),
        Side::new(text2, offset2, depth),
    ));
    true
}
