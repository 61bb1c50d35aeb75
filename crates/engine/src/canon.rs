//! Canonicalization utilities shared by every generator: key/value
//! normalization, CSV-list parsing, the stable base-36 content hash and
//! currency-style number formatting.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Split a comma-separated list, trimming tokens and dropping empties.
/// Order is preserved and duplicates are kept.
#[must_use]
pub fn parse_csv(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Normalize an identifier: trim, lowercase, strip diacritics (NFD then
/// drop combining marks) and collapse whitespace runs to single spaces.
/// Clause variable names and `dataUsed` keys compare through this.
#[must_use]
pub fn normalize_key(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let stripped: String = lowered.nfd().filter(|c| !is_combining_mark(*c)).collect();
    collapse_whitespace(&stripped)
}

/// Normalize a literal value: trim, lowercase, collapse whitespace.
/// Diacritics are kept, unlike [`normalize_key`].
#[must_use]
pub fn normalize_value(input: &str) -> String {
    collapse_whitespace(&input.trim().to_lowercase())
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 32-bit FNV-1a over the string's UTF-16 code units, rendered base-36.
///
/// This is the identity mechanism for generated cases: `CT-` ids are
/// derived from it, so it must be bit-for-bit stable across runs and
/// platforms (wrapping 32-bit arithmetic, seed 2166136261, prime
/// 16777619, lowercase base-36 digits).
#[must_use]
pub fn stable_hash36(input: &str) -> String {
    let mut h: u32 = 2_166_136_261;
    for unit in input.encode_utf16() {
        h ^= u32::from(unit);
        h = h.wrapping_mul(16_777_619);
    }
    to_base36(h)
}

fn to_base36(mut n: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    // u32::MAX in base 36 is 7 digits
    let mut buf = [0u8; 7];
    let mut i = buf.len();
    while n > 0 {
        i -= 1;
        buf[i] = DIGITS[(n % 36) as usize];
        n /= 36;
    }
    String::from_utf8(buf[i..].to_vec()).unwrap_or_default()
}

/// Fixed two-decimal rendering with comma as the decimal separator,
/// optionally prefixed `R$`.
#[must_use]
pub fn format_money_like(value: f64, currency: bool) -> String {
    let fixed = format!("{value:.2}").replace('.', ",");
    if currency {
        format!("R${fixed}")
    } else {
        fixed
    }
}

/// Shortest decimal rendering of a numeric bound, for fingerprints and
/// `dataUsed` (10.0 renders "10", 0.01 renders "0.01").
#[must_use]
pub fn format_num(value: f64) -> String {
    format!("{value}")
}
