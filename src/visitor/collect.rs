//! Owned match records and match-set comparison.

use super::{Match, MatchVisitor};
use ahash::AHashMap;
use serde::Serialize;
use std::fmt;
use std::sync::Mutex;

/// A match detached from the borrowed texts
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MatchRecord {
    pub text_a: String,
    pub offset_a: usize,
    pub len_a: usize,
    pub text_b: String,
    pub offset_b: usize,
    pub len_b: usize,
}

impl From<&Match<'_>> for MatchRecord {
    fn from(m: &Match<'_>) -> Self {
        Self {
            text_a: m.a.text.id().to_string(),
            offset_a: m.a.offset,
            len_a: m.a.len,
            text_b: m.b.text.id().to_string(),
            offset_b: m.b.offset,
            len_b: m.b.len,
        }
    }
}

impl fmt::Display for MatchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}+{}  {}:{}+{}",
            self.text_a, self.offset_a, self.len_a, self.text_b, self.offset_b, self.len_b
        )
    }
}

/// Accumulates every match as a [`MatchRecord`].
///
/// Safe to share between the workers of the sharded matcher.
#[derive(Debug, Default)]
pub struct CollectVisitor {
    records: Mutex<Vec<MatchRecord>>,
}

impl CollectVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records collected so far
    pub fn records(&self) -> Vec<MatchRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_else(|e| e.into_inner().clone())
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or_else(|e| e.into_inner().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_records(self) -> Vec<MatchRecord> {
        self.records.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl MatchVisitor for CollectVisitor {
    fn matched(&self, m: &Match<'_>) {
        let record = MatchRecord::from(m);
        match self.records.lock() {
            Ok(mut records) => records.push(record),
            // A panicking sibling visitor must not hide this match
            Err(poisoned) => poisoned.into_inner().push(record),
        }
    }
}

/// `(text_a, text_b, offset_a, offset_b)`
pub type MatchKey = (String, String, usize, usize);

/// Unordered multiset of matches keyed by `(text_a, text_b, offset_a, offset_b)`.
///
/// With `canonical` set, each key is oriented so the smaller text id comes
/// first, which makes directed and undirected engines comparable.
#[derive(Debug, Clone, Default)]
pub struct MatchSet {
    counts: AHashMap<MatchKey, usize>,
    canonical: bool,
}

impl MatchSet {
    /// Multiset keeping each match in its reported direction
    pub fn directed() -> Self {
        Self::default()
    }

    /// Multiset folding both directions of a match onto one key
    pub fn canonical() -> Self {
        Self {
            counts: AHashMap::new(),
            canonical: true,
        }
    }

    pub fn from_records<'r>(records: impl IntoIterator<Item = &'r MatchRecord>, canonical: bool) -> Self {
        let mut set = if canonical { Self::canonical() } else { Self::directed() };
        for record in records {
            set.insert(record);
        }
        set
    }

    pub fn insert(&mut self, record: &MatchRecord) {
        let key = if self.canonical && record.text_b < record.text_a {
            (record.text_b.clone(), record.text_a.clone(), record.offset_b, record.offset_a)
        } else {
            (record.text_a.clone(), record.text_b.clone(), record.offset_a, record.offset_b)
        };
        *self.counts.entry(key).or_insert(0) += 1;
    }

    /// Number of times a key was inserted
    pub fn count(&self, text_a: &str, text_b: &str, offset_a: usize, offset_b: usize) -> usize {
        let key = if self.canonical && text_b < text_a {
            (text_b.to_string(), text_a.to_string(), offset_b, offset_a)
        } else {
            (text_a.to_string(), text_b.to_string(), offset_a, offset_b)
        };
        self.counts.get(&key).copied().unwrap_or(0)
    }

    /// Total number of inserted matches, duplicates included
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of distinct keys
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Whether any key was inserted more than once
    pub fn has_duplicates(&self) -> bool {
        self.counts.values().any(|&c| c > 1)
    }

    /// Keys whose counts differ between the two sets, sorted
    pub fn difference(&self, other: &MatchSet) -> Vec<(MatchKey, usize, usize)> {
        let mut diff = Vec::new();
        for (key, &count) in &self.counts {
            let theirs = other.counts.get(key).copied().unwrap_or(0);
            if theirs != count {
                diff.push((key.clone(), count, theirs));
            }
        }
        for (key, &count) in &other.counts {
            if !self.counts.contains_key(key) {
                diff.push((key.clone(), 0, count));
            }
        }
        diff.sort();
        diff
    }
}
