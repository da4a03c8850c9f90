//! Order-sensitive hashing of symbol runs.
//!
//! Follows the per-block mixing of 32-bit MurmurHash3 without aiming for
//! compatibility with it. Every index, the stencil sampler and the sharded
//! matcher hash through these functions, so the bucket chosen for a run is
//! the same no matter which engine computed it.

/// Fixed seed for every symbol hash
pub const SEED: u32 = 0x0bca_a747;

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;
const FOLD_ADD: u32 = 0xe654_6b64;

/// Mix a single symbol before it is folded into the running state.
///
/// The sharded matcher applies this once per corpus position up front and
/// then folds the pre-mixed values with [`hash_premixed`].
#[inline]
pub fn premix(symbol: u32) -> u32 {
    symbol.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2)
}

/// Fold one pre-mixed value into the running state
#[inline]
pub fn fold(state: u32, mixed: u32) -> u32 {
    (state ^ mixed)
        .rotate_left(13)
        .wrapping_mul(5)
        .wrapping_add(FOLD_ADD)
}

/// Final avalanche mix
#[inline]
pub fn fmix(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

/// Hash a run of symbols with the fixed seed
#[inline]
pub fn hash_symbols(symbols: &[u32]) -> u32 {
    hash_symbols_seeded(symbols, SEED)
}

/// Hash a run of symbols with an explicit seed
pub fn hash_symbols_seeded(symbols: &[u32], seed: u32) -> u32 {
    fmix(symbols.iter().fold(seed, |h, &s| fold(h, premix(s))))
}

/// Hash values that already went through [`premix`].
///
/// `hash_premixed(&xs.map(premix)) == hash_symbols(&xs)` for every `xs`.
#[inline]
pub fn hash_premixed(mixed: &[u32]) -> u32 {
    fmix(mixed.iter().fold(SEED, |h, &k| fold(h, k)))
}
