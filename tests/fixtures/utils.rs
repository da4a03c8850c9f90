//! Shared helpers for the integration tests: deterministic corpora and
//! match-set collection for every engine.

#![allow(dead_code)]

use lemmatch::index::slow;
use lemmatch::{
    CollectVisitor, ExactIndex, MatchRecord, MatchSet, RadixMatcher, ShardedConfig, ShardedMatcher,
    StencilIndex, StencilModel, SymbolSequence,
};

/// Small deterministic generator so fixtures do not depend on a RNG crate
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed.wrapping_mul(0x9e37_79b9_7f4a_7c15) | 1)
    }

    pub fn next(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 33) as u32
    }

    pub fn below(&mut self, n: u32) -> u32 {
        self.next() % n
    }
}

/// `ntexts` sequences of random symbols from `2..2 + alphabet`, ids `t0, t1, ...`.
///
/// A shared run of 12 symbols is planted at a random offset in every third
/// text so that long matches exist even with large alphabets.
pub fn corpus(ntexts: usize, len: usize, alphabet: u32, seed: u64) -> Vec<SymbolSequence> {
    let mut rng = Lcg::new(seed);
    let planted: Vec<u32> = (0..12).map(|_| 2 + rng.below(alphabet)).collect();

    (0..ntexts)
        .map(|t| {
            let mut symbols: Vec<u32> = (0..len).map(|_| 2 + rng.below(alphabet)).collect();
            if t % 3 == 0 && len >= planted.len() {
                let at = rng.below((len - planted.len() + 1) as u32) as usize;
                symbols[at..at + planted.len()].copy_from_slice(&planted);
            }
            SymbolSequence::new(format!("t{}", t), symbols)
        })
        .collect()
}

/// Sequences named by position from raw symbol vectors
pub fn named(raw: &[Vec<u32>]) -> Vec<SymbolSequence> {
    raw.iter()
        .enumerate()
        .map(|(i, symbols)| SymbolSequence::new(format!("s{}", i), symbols.clone()))
        .collect()
}

/// Exact index used online: search each text, then add it
pub fn exact_online(texts: &[SymbolSequence], length: usize) -> Vec<MatchRecord> {
    let mut index = ExactIndex::new(length).unwrap();
    let collect = CollectVisitor::new();
    for text in texts {
        index.search(text, &collect);
        index.add(text).unwrap();
    }
    collect.into_records()
}

/// Exact index holding the whole corpus, queried with every text
pub fn exact_full(texts: &[SymbolSequence], length: usize) -> Vec<MatchRecord> {
    let mut index = ExactIndex::new(length).unwrap();
    for text in texts {
        index.add(text).unwrap();
    }
    let collect = CollectVisitor::new();
    for text in texts {
        index.search(text, &collect);
    }
    collect.into_records()
}

/// Stencil index holding the whole corpus, queried with every text
pub fn stencil_full(texts: &[SymbolSequence], model: &StencilModel) -> Vec<MatchRecord> {
    let mut index = StencilIndex::new(model.clone());
    for text in texts {
        index.add(text).unwrap();
    }
    let collect = CollectVisitor::new();
    for text in texts {
        index.search(text, &collect);
    }
    collect.into_records()
}

pub fn sharded(texts: &[SymbolSequence], model: &StencilModel, workers: usize) -> Vec<MatchRecord> {
    let config = ShardedConfig {
        workers,
        chunk_size: 7,
        max_chain: usize::MAX,
    };
    let mut matcher = ShardedMatcher::with_config(config).unwrap();
    let collect = CollectVisitor::new();
    matcher.search(texts, model, &collect).unwrap();
    collect.into_records()
}

pub fn radix(texts: &[SymbolSequence], depth: usize) -> Vec<MatchRecord> {
    let collect = CollectVisitor::new();
    RadixMatcher::search_sequences(&collect, texts, depth).unwrap();
    collect.into_records()
}

pub fn brute_force(texts: &[SymbolSequence], depth: usize) -> Vec<MatchRecord> {
    let collect = CollectVisitor::new();
    slow::search(&collect, texts, depth).unwrap();
    collect.into_records()
}

pub fn canonical(records: &[MatchRecord]) -> MatchSet {
    MatchSet::from_records(records, true)
}

pub fn directed(records: &[MatchRecord]) -> MatchSet {
    MatchSet::from_records(records, false)
}

/// Panic with the first few differing keys if the sets disagree
pub fn assert_same(name: &str, actual: &MatchSet, expected: &MatchSet) {
    let diff = actual.difference(expected);
    assert!(
        diff.is_empty(),
        "{} differs on {} keys, first: {:?}",
        name,
        diff.len(),
        &diff[..diff.len().min(5)]
    );
}
