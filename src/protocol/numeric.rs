// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Lenient number parsing for command lines.
//!
//! Both parsers take the longest numeric prefix of the input and ignore the rest. Input without a
//! usable prefix yields zero rather than an error: a garbled target line moves the axis to 0.0, and
//! a garbled channel number selects channel 0, which is never on the allow-list.

/// Parse a leading decimal integer, or 0.
///
/// Leading ASCII whitespace and one sign are accepted. Values beyond `i32` saturate.
pub fn parse_int_or_zero(s: &str) -> i32 {
    let bytes = s.as_bytes();
    let mut i = skip_whitespace(bytes);

    let negative = match bytes.get(i) {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    let mut value: i64 = 0;
    while let Some(d) = bytes.get(i).filter(|b| b.is_ascii_digit()) {
        value = (value * 10 + (d - b'0') as i64).min(i32::MAX as i64 + 1);
        i += 1;
    }

    if negative {
        value = -value;
    }
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Parse a leading decimal floating-point number, or 0.0.
///
/// Accepts `[sign] digits [. digits] [(e|E) [sign] digits]` after optional whitespace, where at
/// least one mantissa digit is required. An exponent marker without digits is left unconsumed.
pub fn parse_float_or_zero(s: &str) -> f32 {
    let bytes = s.as_bytes();
    let start = skip_whitespace(bytes);
    let mut i = start;

    if matches!(bytes.get(i), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_digits = count_digits(&bytes[i..]);
    i += int_digits;

    let mut frac_digits = 0;
    if bytes.get(i) == Some(&b'.') {
        frac_digits = count_digits(&bytes[i + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            i += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_digits = count_digits(&bytes[j..]);
        if exp_digits > 0 {
            i = j + exp_digits;
        }
    }

    // The prefix is pure ASCII, so slicing on these byte indices stays on char boundaries.
    s[start..i].parse::<f32>().unwrap_or(0.0)
}

#[inline]
fn skip_whitespace(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_whitespace()).count()
}

#[inline]
fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
