//! Content-derived identity codes.
//!
//! A code is the BLAKE3 digest of the content rendered as 24 base-62 digits,
//! least significant digit first, over a shuffled alphabet in which the
//! digit zero is still `'0'`.

/// Shuffled base-62 alphabet
pub const ALPHABET: &[u8; 62] = b"0JXD9UsYGREMitBfQAcgdxmCeV1ZTz4krq6vWOpbFlIKP7Sayhj28L5wN3uonH";

/// Number of digits in a rendered code
pub const CODE_SIZE: usize = 24;

/// Identity code for arbitrary bytes
pub fn content_code(bytes: &[u8]) -> String {
    bytes_to_code(blake3::hash(bytes).as_bytes())
}

/// Identity code for a symbol run, hashing each symbol as little-endian bytes
pub fn symbols_code(symbols: &[u32]) -> String {
    let mut hasher = blake3::Hasher::new();
    for symbol in symbols {
        hasher.update(&symbol.to_le_bytes());
    }
    bytes_to_code(hasher.finalize().as_bytes())
}

/// Render big-endian bytes as a base-62 code of [`CODE_SIZE`] digits.
///
/// Digits beyond the code size are discarded, so long inputs only keep
/// their low-order part.
pub fn bytes_to_code(bytes: &[u8]) -> String {
    let mut number = bytes.to_vec();
    let mut out = String::with_capacity(CODE_SIZE);
    for _ in 0..CODE_SIZE {
        let digit = div_rem_62(&mut number);
        out.push(char::from(ALPHABET[digit as usize]));
    }
    out
}

/// Divide a big-endian number in place by 62, returning the remainder
fn div_rem_62(number: &mut [u8]) -> u8 {
    let mut rem: u32 = 0;
    for byte in number.iter_mut() {
        let cur = (rem << 8) | u32::from(*byte);
        *byte = (cur / 62) as u8;
        rem = cur % 62;
    }
    rem as u8
}
