//! Corpus files for the command line.
//!
//! A corpus is a JSON array of already-tokenised sequences:
//!
//! ```json
//! [
//!   { "id": "main.c", "symbols": [12, 7, 7, 40], "offsets": [0, 4, 6, 9], "lengths": [3, 1, 1, 2] },
//!   { "symbols": [7, 7, 40] }
//! ]
//! ```
//!
//! Spans are optional but must come as a pair. Entries without an id get
//! one derived from their symbols.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::model::{SymbolSequence, symbols_code};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CorpusEntry {
    #[serde(default)]
    id: Option<String>,
    symbols: Vec<u32>,
    #[serde(default)]
    offsets: Option<Vec<u32>>,
    #[serde(default)]
    lengths: Option<Vec<u8>>,
}

impl CorpusEntry {
    fn into_sequence(self, index: usize) -> Result<SymbolSequence> {
        let id = match self.id {
            Some(id) => id,
            None => symbols_code(&self.symbols),
        };

        let (offsets, lengths) = match (self.offsets, self.lengths) {
            (Some(offsets), Some(lengths)) => (offsets, lengths),
            (None, None) => (Vec::new(), Vec::new()),
            _ => bail!("entry {} ({}): offsets and lengths must be given together", index, id),
        };

        SymbolSequence::with_spans(id.clone(), self.symbols, offsets, lengths, Vec::new())
            .with_context(|| format!("entry {} ({}) has invalid spans", index, id))
    }
}

/// Parse a corpus from JSON text
pub fn parse(json: &str) -> Result<Vec<SymbolSequence>> {
    let entries: Vec<CorpusEntry> = serde_json::from_str(json).context("Failed to parse corpus")?;

    let texts = entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| entry.into_sequence(i))
        .collect::<Result<Vec<_>>>()?;

    let duplicates = count_duplicate_ids(&texts);
    if duplicates > 0 {
        // Equal identities never match each other
        warn!(duplicates, "corpus has sequences sharing an identity");
    }
    Ok(texts)
}

/// Read and parse a corpus file
pub fn load(path: &Path) -> Result<Vec<SymbolSequence>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus {}", path.display()))?;
    let texts = parse(&content).with_context(|| format!("In corpus {}", path.display()))?;

    debug!(
        path = %path.display(),
        texts = texts.len(),
        symbols = texts.iter().map(SymbolSequence::len).sum::<usize>(),
        "corpus loaded"
    );
    Ok(texts)
}

fn count_duplicate_ids(texts: &[SymbolSequence]) -> usize {
    let mut seen = ahash::AHashSet::with_capacity(texts.len());
    texts.iter().filter(|t| !seen.insert(t.id())).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_and_without_spans() {
        let texts = parse(
            r#"[
                {"id": "a", "symbols": [5, 6, 7], "offsets": [0, 2, 5], "lengths": [1, 2, 1]},
                {"id": "b", "symbols": [6, 7]}
            ]"#,
        )
        .unwrap();

        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0].id(), "a");
        assert!(texts[0].has_spans());
        assert_eq!(texts[0].max_char(1), 4);
        assert!(!texts[1].has_spans());
        assert_eq!(texts[1].symbols(), &[6, 7]);
    }

    #[test]
    fn test_missing_id_is_derived_from_content() {
        let texts = parse(r#"[{"symbols": [1, 2, 3]}, {"symbols": [1, 2, 3]}, {"symbols": [3, 2, 1]}]"#).unwrap();

        assert_eq!(texts[0].id(), symbols_code(&[1, 2, 3]));
        assert_eq!(texts[0], texts[1]);
        assert_ne!(texts[0], texts[2]);
        assert_eq!(count_duplicate_ids(&texts), 1);
    }

    #[test]
    fn test_rejects_bad_entries() {
        // Half a span pair
        assert!(parse(r#"[{"symbols": [1], "offsets": [0]}]"#).is_err());
        // Span count does not match symbol count
        assert!(parse(r#"[{"symbols": [1, 2], "offsets": [0], "lengths": [1]}]"#).is_err());
        // Overlapping spans
        assert!(parse(r#"[{"symbols": [1, 2], "offsets": [0, 1], "lengths": [3, 1]}]"#).is_err());
        // Span running past the last representable offset
        assert!(parse(r#"[{"symbols": [1], "offsets": [4294967295], "lengths": [5]}]"#).is_err());
        // Unknown field
        assert!(parse(r#"[{"symbols": [1], "tokens": []}]"#).is_err());
        // Symbols must be non-negative
        assert!(parse(r#"[{"symbols": [-1]}]"#).is_err());
    }

    #[test]
    fn test_empty_corpus() {
        assert!(parse("[]").unwrap().is_empty());
    }
}
