#![no_main]

use arbitrary::Arbitrary;
use lemmatch::index::slow;
use lemmatch::{CollectVisitor, MatchSet, RadixMatcher, SymbolSequence};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    depth: u8,
    texts: Vec<Vec<u32>>,
}

fuzz_target!(|input: Input| {
    // Radix matching must find exactly what brute force finds, for any
    // symbols including the tape's reserved values
    let depth = usize::from(input.depth % 8) + 1;
    let texts: Vec<SymbolSequence> = input
        .texts
        .into_iter()
        .take(8)
        .enumerate()
        .map(|(i, mut symbols)| {
            symbols.truncate(64);
            SymbolSequence::new(format!("f{}", i), symbols)
        })
        .collect();

    let radix = CollectVisitor::new();
    RadixMatcher::search_sequences(&radix, &texts, depth).unwrap();
    let brute = CollectVisitor::new();
    slow::search(&brute, &texts, depth).unwrap();

    let radix = MatchSet::from_records(&radix.into_records(), true);
    let brute = MatchSet::from_records(&brute.into_records(), true);
    assert!(radix.difference(&brute).is_empty());
});
