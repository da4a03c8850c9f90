//! Depth-bounded radix sort over tape suffixes
//!
//! Every tape position that leaves room for `depth` symbols starts a
//! candidate suffix. Suffixes are partitioned MSD-first, one stable
//! counting pass per column. A partition that survives `depth` columns
//! holds suffixes agreeing on their first `depth` symbols, so every pair in
//! it whose windows stay inside two different sequences is a match.
//!
//! Recursion depth never exceeds `depth`.

use super::tape::SequenceTape;
use crate::error::{MatchError, Result};
use crate::model::SymbolSequence;
use crate::visitor::{Match, MatchVisitor, Side};
use std::borrow::{Borrow, Cow};

/// Partitions this small are insertion sorted instead of counted
const INSERTION_THRESHOLD: usize = 32;

/// Alphabets larger than this (and than the tape) are ranked densely first
const DENSE_LIMIT: usize = 1 << 16;

/// Reusable radix matcher bound to one tape and depth
pub struct RadixMatcher<'a, 't> {
    tape: &'a SequenceTape<'t>,
    depth: usize,
    /// Number of candidate suffixes
    nsuff: usize,
    /// Sort key per tape position
    keys: Cow<'a, [u32]>,
    /// Number of distinct key values
    nkeys: usize,
    /// Bucket counts per column, allocated when a counting pass first reaches it
    counts: Vec<Vec<u32>>,
    /// Running bucket offsets for the column being sorted
    index: Vec<u32>,
    suffix: Vec<u32>,
    buffer: Vec<u32>,
    /// Keys of the partition being sorted, read once per column
    oracle: Vec<u32>,
}

impl<'a, 't> RadixMatcher<'a, 't> {
    pub fn new(tape: &'a SequenceTape<'t>, depth: usize) -> Result<Self> {
        if depth == 0 {
            return Err(MatchError::InvalidMatchLength);
        }

        let nsuff = tape.len().saturating_sub(depth);
        let (keys, nkeys) = sort_keys(tape);

        Ok(Self {
            tape,
            depth,
            nsuff,
            keys,
            nkeys,
            counts: Vec::new(),
            index: vec![0; nkeys],
            suffix: Vec::with_capacity(nsuff),
            buffer: vec![0; nsuff],
            oracle: vec![0; nsuff],
        })
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Report every pair of `depth`-long windows with equal symbols in two
    /// different sequences.
    ///
    /// Each unordered pair is reported once, with the sequence that comes
    /// first on the tape as side `a`.
    pub fn search<V>(&mut self, visitor: &V)
    where
        V: MatchVisitor + ?Sized,
    {
        self.suffix.clear();
        self.suffix.extend(0..self.nsuff as u32);
        self.partition(0, self.nsuff, 0, visitor);
    }

    /// Build a tape over `texts` and search it once
    pub fn search_sequences<T, V>(visitor: &V, texts: &[T], depth: usize) -> Result<()>
    where
        T: Borrow<SymbolSequence>,
        V: MatchVisitor + ?Sized,
    {
        let tape = SequenceTape::new(texts)?;
        RadixMatcher::new(&tape, depth)?.search(visitor);
        Ok(())
    }

    #[inline]
    fn key(&self, pos: usize) -> usize {
        self.keys[pos] as usize
    }

    fn partition<V>(&mut self, min: usize, max: usize, column: usize, visitor: &V)
    where
        V: MatchVisitor + ?Sized,
    {
        if max - min < 2 {
            return;
        }
        if column >= self.depth {
            self.report(min, max, visitor);
            return;
        }
        if max - min <= INSERTION_THRESHOLD {
            self.insertion_sort(min, max, column);
            self.recurse_runs(min, max, column, visitor);
            return;
        }

        for i in min..max {
            self.oracle[i] = self.keys[self.suffix[i] as usize + column];
        }

        if self.counts.len() <= column {
            self.counts.resize_with(column + 1, Vec::new);
        }
        let counts = &mut self.counts[column];
        if counts.is_empty() {
            counts.resize(self.nkeys, 0);
        } else {
            counts.fill(0);
        }
        for &key in &self.oracle[min..max] {
            counts[key as usize] += 1;
        }

        let mut sum = 0;
        for (slot, &count) in self.index.iter_mut().zip(counts.iter()) {
            *slot = sum;
            sum += count;
        }

        for i in min..max {
            let slot = &mut self.index[self.oracle[i] as usize];
            self.buffer[*slot as usize] = self.suffix[i];
            *slot += 1;
        }
        self.suffix[min..max].copy_from_slice(&self.buffer[..max - min]);

        let mut cursor = min;
        for key in 0..self.nkeys {
            let count = self.counts[column][key] as usize;
            if count > 1 {
                self.partition(cursor, cursor + count, column + 1, visitor);
            }
            cursor += count;
        }
        debug_assert_eq!(cursor, max);
    }

    /// Stable insertion sort of `min..max` by the symbol at `column`
    fn insertion_sort(&mut self, min: usize, max: usize, column: usize) {
        for i in min + 1..max {
            let key = self.key(self.suffix[i] as usize + column);
            let mut j = i;
            while j > min && self.key(self.suffix[j - 1] as usize + column) > key {
                self.suffix.swap(j, j - 1);
                j -= 1;
            }
        }
    }

    /// Recurse into each run of equal keys at `column` of a sorted range
    fn recurse_runs<V>(&mut self, min: usize, max: usize, column: usize, visitor: &V)
    where
        V: MatchVisitor + ?Sized,
    {
        let mut start = min;
        while start < max {
            let key = self.key(self.suffix[start] as usize + column);
            let mut end = start + 1;
            while end < max && self.key(self.suffix[end] as usize + column) == key {
                end += 1;
            }
            if end - start > 1 {
                self.partition(start, end, column + 1, visitor);
            }
            start = end;
        }
    }

    /// Report all valid pairs of a fully agreeing partition
    fn report<V>(&self, min: usize, max: usize, visitor: &V)
    where
        V: MatchVisitor + ?Sized,
    {
        let tape = self.tape;
        let depth = self.depth;

        for i1 in min..max {
            let pos1 = self.suffix[i1] as usize;
            if !tape.window_in_one_text(pos1, depth) {
                continue;
            }
            let owner1 = tape.raw_owner(pos1);
            let text1 = tape.text(owner1 as usize);

            for &pos2 in &self.suffix[i1 + 1..max] {
                let pos2 = pos2 as usize;
                let owner2 = tape.raw_owner(pos2);
                if owner2 == owner1 || !tape.window_in_one_text(pos2, depth) {
                    continue;
                }

                let text2 = tape.text(owner2 as usize);
                if text1 == text2 {
                    continue;
                }

                visitor.matched(&Match::new(
                    Side::new(text1, tape.raw_offset(pos1) as usize, depth),
                    Side::new(text2, tape.raw_offset(pos2) as usize, depth),
                ));
            }
        }
    }
}

/// Sort keys for every tape position and the size of the key alphabet.
///
/// Small alphabets use the symbols directly. Sparse large ones are replaced
/// by their rank among the distinct tape symbols, which keeps the per-column
/// count arrays proportional to the tape.
fn sort_keys<'a>(tape: &'a SequenceTape<'_>) -> (Cow<'a, [u32]>, usize) {
    let direct = tape.maximum() as usize + 1;
    if direct <= DENSE_LIMIT || direct <= tape.len() {
        return (Cow::Borrowed(tape.symbols()), direct);
    }

    let mut distinct = tape.symbols().to_vec();
    distinct.sort_unstable();
    distinct.dedup();

    let ranks = tape
        .symbols()
        .iter()
        .map(|s| distinct.partition_point(|d| d < s) as u32)
        .collect();
    (Cow::Owned(ranks), distinct.len())
}
