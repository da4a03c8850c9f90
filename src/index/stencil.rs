//! Stencil models: fixed sampling patterns over a symbol sequence.
//!
//! A stencil is a list of `size` offsets relative to a start position. A
//! contiguous run of length `n` is the stencil `0..n`; gapped stencils
//! sample positions such as `[0, 2, 3, 5]` and so match runs with
//! insertions between the sampled symbols. A model holds up to
//! [`MAX_STENCILS`] patterns of the same size.

use crate::error::{MatchError, Result};

/// Patterns are identified by one byte in a posting
pub const MAX_STENCILS: usize = 256;

/// A set of equally sized sampling patterns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StencilModel {
    size: usize,
    /// `size` offsets per pattern, patterns back to back
    offsets: Vec<u32>,
    /// Max offset + 1 for each pattern
    widths: Vec<usize>,
    /// Sort each sample before hashing and comparing
    sorted: bool,
}

impl StencilModel {
    /// Build a model from flattened patterns of `size` offsets each
    pub fn new(size: usize, offsets: Vec<u32>, sorted: bool) -> Result<Self> {
        if size == 0 {
            return Err(MatchError::InvalidStencil("stencil size must be positive".into()));
        }
        if offsets.is_empty() || offsets.len() % size != 0 {
            return Err(MatchError::InvalidStencil(format!(
                "{} offsets do not split into patterns of {}",
                offsets.len(),
                size
            )));
        }

        let nstencils = offsets.len() / size;
        if nstencils > MAX_STENCILS {
            return Err(MatchError::InvalidStencil(format!(
                "{} patterns, at most {} are addressable",
                nstencils, MAX_STENCILS
            )));
        }

        let mut widths = Vec::with_capacity(nstencils);
        for (i, pattern) in offsets.chunks_exact(size).enumerate() {
            let width = pattern.iter().copied().max().unwrap_or(0) as usize + 1;
            if width < size {
                return Err(MatchError::InvalidStencil(format!(
                    "pattern {} spans {} positions but samples {}",
                    i, width, size
                )));
            }
            widths.push(width);
        }

        Ok(Self {
            size,
            offsets,
            widths,
            sorted,
        })
    }

    /// Single pattern sampling `len` consecutive symbols
    pub fn contiguous(len: usize) -> Result<Self> {
        let offsets = (0..len).map(|o| o as u32).collect();
        Self::new(len, offsets, false)
    }

    /// Every pattern of `size` increasing offsets that starts at 0 and ends
    /// at `width - 1`.
    ///
    /// For `size = 3, width = 4` this yields `[0, 1, 3]` and `[0, 2, 3]`.
    pub fn gapped(size: usize, width: usize, sorted: bool) -> Result<Self> {
        if size == 0 || width < size {
            return Err(MatchError::InvalidStencil(format!(
                "cannot place {} samples in a window of {}",
                size, width
            )));
        }
        if size == 1 {
            if width != 1 {
                return Err(MatchError::InvalidStencil(format!(
                    "a single sample cannot span a window of {}",
                    width
                )));
            }
            return Self::new(1, vec![0], sorted);
        }

        let last = (width - 1) as u32;
        let inner = size - 2;
        let mut offsets = Vec::new();
        let mut pick: Vec<u32> = (1..=inner as u32).collect();

        loop {
            if offsets.len() / size >= MAX_STENCILS {
                return Err(MatchError::InvalidStencil(format!(
                    "size {} in width {} yields more than {} patterns",
                    size, width, MAX_STENCILS
                )));
            }
            offsets.push(0);
            offsets.extend_from_slice(&pick);
            offsets.push(last);

            if !next_combination(&mut pick, last - 1) {
                break;
            }
        }

        Self::new(size, offsets, sorted)
    }

    /// Number of samples per pattern
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of patterns
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    pub fn sorted(&self) -> bool {
        self.sorted
    }

    /// Offsets of pattern `stencil`
    pub fn pattern(&self, stencil: usize) -> &[u32] {
        &self.offsets[stencil * self.size..(stencil + 1) * self.size]
    }

    /// Positions spanned by pattern `stencil`
    #[inline]
    pub fn width(&self, stencil: usize) -> usize {
        self.widths[stencil]
    }

    /// Widest pattern in the model
    pub fn max_width(&self) -> usize {
        self.widths.iter().copied().max().unwrap_or(0)
    }

    /// Copy the symbols under pattern `stencil` placed at `start` into `buf`.
    ///
    /// Panics if `buf` is not `size` long or the pattern overruns `symbols`.
    #[inline]
    pub fn sample(&self, buf: &mut [u32], symbols: &[u32], start: usize, stencil: usize) {
        debug_assert_eq!(buf.len(), self.size);
        for (slot, &offset) in buf.iter_mut().zip(self.pattern(stencil)) {
            *slot = symbols[start + offset as usize];
        }
        if self.sorted {
            buf.sort_unstable();
        }
    }
}

/// Advance `pick` to the next increasing combination with values in
/// `1..=max`. Returns false once the last combination was passed.
fn next_combination(pick: &mut [u32], max: u32) -> bool {
    let k = pick.len();
    for i in (0..k).rev() {
        let limit = max - (k - 1 - i) as u32;
        if pick[i] < limit {
            pick[i] += 1;
            for j in i + 1..k {
                pick[j] = pick[j - 1] + 1;
            }
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contiguous() {
        let model = StencilModel::contiguous(4).unwrap();
        assert_eq!(model.len(), 1);
        assert_eq!(model.size(), 4);
        assert_eq!(model.width(0), 4);
        assert_eq!(model.pattern(0), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(StencilModel::new(0, vec![0], false).is_err());
        assert!(StencilModel::new(2, vec![], false).is_err());
        assert!(StencilModel::new(2, vec![0, 1, 2], false).is_err());
        // Two samples cannot fit in a width of one
        assert!(StencilModel::new(2, vec![0, 0], false).is_err());
        assert!(StencilModel::contiguous(0).is_err());
    }

    #[test]
    fn test_rejects_too_many_patterns() {
        let offsets: Vec<u32> = (0..257).collect();
        assert!(StencilModel::new(1, offsets, false).is_err());
    }

    #[test]
    fn test_gapped_patterns() {
        let model = StencilModel::gapped(3, 5, false).unwrap();
        assert_eq!(model.len(), 3);
        assert_eq!(model.pattern(0), &[0, 1, 4]);
        assert_eq!(model.pattern(1), &[0, 2, 4]);
        assert_eq!(model.pattern(2), &[0, 3, 4]);
        assert_eq!(model.max_width(), 5);
        assert!((0..model.len()).all(|i| model.width(i) == 5));
    }

    #[test]
    fn test_gapped_counts() {
        // C(width - 2, size - 2) patterns
        assert_eq!(StencilModel::gapped(4, 8, false).unwrap().len(), 15);
        assert_eq!(StencilModel::gapped(2, 6, false).unwrap().len(), 1);
        assert_eq!(StencilModel::gapped(5, 5, false).unwrap().len(), 1);
        assert_eq!(StencilModel::gapped(1, 1, false).unwrap().pattern(0), &[0]);

        assert!(StencilModel::gapped(3, 2, false).is_err());
        assert!(StencilModel::gapped(1, 3, false).is_err());
        // C(20, 5) = 15504
        assert!(StencilModel::gapped(7, 22, false).is_err());
    }

    #[test]
    fn test_sample() {
        let model = StencilModel::new(3, vec![0, 2, 3, 0, 1, 4], false).unwrap();
        let symbols = [10, 11, 12, 13, 14, 15];
        let mut buf = [0; 3];

        model.sample(&mut buf, &symbols, 1, 0);
        assert_eq!(buf, [11, 13, 14]);

        model.sample(&mut buf, &symbols, 1, 1);
        assert_eq!(buf, [11, 12, 15]);
        assert_eq!(model.width(1), 5);
    }

    #[test]
    fn test_sorted_sample() {
        let model = StencilModel::new(3, vec![0, 1, 2], true).unwrap();
        let mut buf = [0; 3];

        model.sample(&mut buf, &[9, 4, 7], 0, 0);
        assert_eq!(buf, [4, 7, 9]);
    }
}
