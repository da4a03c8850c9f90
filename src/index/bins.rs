//! Fixed hash bin table shared by the exact and stencil indices.
//!
//! Postings are stored XOR-folded with the hash of the run that produced
//! them and carry no verification key. A lookup decodes each posting with
//! the query's own hash; postings from a colliding hash decode to garbage
//! that the caller rejects by range checks before any symbol comparison.

/// log2 of the number of bins
pub const BIN_BITS: u32 = 20;

/// Total number of bins in the table
pub const NBINS: usize = 1 << BIN_BITS;

/// Bit mask selecting a bin from a hash
pub const BIN_MASK: u32 = (NBINS as u32) - 1;

/// Bin selected by a run hash
#[inline]
pub fn bin_of(hash: u32) -> usize {
    (hash & BIN_MASK) as usize
}

/// Whether a window of `width` symbols starting at `start` fits in `len`
#[inline]
pub fn window_fits(start: usize, width: usize, len: usize) -> bool {
    start.checked_add(width).is_some_and(|end| end <= len)
}

/// Posting for a contiguous run: `(text ^ hash, start ^ hash)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPosting {
    pub text: u32,
    pub start: u32,
}

impl RunPosting {
    #[inline]
    pub fn encode(text: u32, start: u32, hash: u32) -> Self {
        Self {
            text: text ^ hash,
            start: start ^ hash,
        }
    }

    /// Decode with the hash the query computed
    #[inline]
    pub fn decode(&self, hash: u32) -> (usize, usize) {
        ((self.text ^ hash) as usize, (self.start ^ hash) as usize)
    }
}

/// Posting for a stencil sample, with the pattern that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StencilPosting {
    pub text: u32,
    pub start: u32,
    pub stencil: u8,
}

impl StencilPosting {
    #[inline]
    pub fn encode(text: u32, start: u32, stencil: u8, hash: u32) -> Self {
        Self {
            text: text ^ hash,
            start: start ^ hash,
            stencil,
        }
    }

    #[inline]
    pub fn decode(&self, hash: u32) -> (usize, usize, usize) {
        (
            (self.text ^ hash) as usize,
            (self.start ^ hash) as usize,
            self.stencil as usize,
        )
    }
}

/// `NBINS` growable bins of postings.
///
/// Each posting is one struct, so the fields of an entry can never drift
/// out of step with each other. Entries are only appended; `clear` empties
/// every bin but keeps the allocations for the next run.
#[derive(Debug, Clone)]
pub struct BinTable<P> {
    bins: Vec<Vec<P>>,
    len: usize,
}

impl<P: Copy> BinTable<P> {
    pub fn new() -> Self {
        let mut bins = Vec::with_capacity(NBINS);
        bins.resize_with(NBINS, Vec::new);
        Self { bins, len: 0 }
    }

    /// Append a posting to the bin chosen by `hash`
    #[inline]
    pub fn push(&mut self, hash: u32, posting: P) {
        self.bins[bin_of(hash)].push(posting);
        self.len += 1;
    }

    /// Postings of the bin chosen by `hash`, in insertion order
    #[inline]
    pub fn bin(&self, hash: u32) -> &[P] {
        &self.bins[bin_of(hash)]
    }

    /// Total number of postings
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of bins holding at least one posting
    pub fn occupied_bins(&self) -> usize {
        self.bins.iter().filter(|b| !b.is_empty()).count()
    }

    pub fn clear(&mut self) {
        for bin in &mut self.bins {
            bin.clear();
        }
        self.len = 0;
    }
}

impl<P: Copy> Default for BinTable<P> {
    fn default() -> Self {
        Self::new()
    }
}
