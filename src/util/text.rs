use std::{collections::HashSet, str::FromStr};

use anyhow::*;

/// Parses an `f64` value from a given string.
///
/// Every character listed in `escape_chars` (typically thousands separators)
/// is removed before parsing, so `"15,500.25"` with `[',']` becomes `15500.25`.
/// An underscore between two digits groups them, as in `"1_000"`; anywhere
/// else it makes the value invalid. Surrounding whitespace is not tolerated;
/// callers trim beforehand.
///
/// # Arguments
///
/// * `s`: A string slice containing the representation of a number.
/// * `escape_chars`: Characters to be removed from the input string.
///
/// # Returns
///
/// * `Result<f64>`: The parsed value, or an error naming the cleaned text.
pub fn parse_f64(s: &str, escape_chars: &[char]) -> Result<f64> {
    let cleaned = strip_digit_underscores(&clean_escape_chars(s, escape_chars));
    f64::from_str(&cleaned)
        .map_err(|why| anyhow!("Failed to parse '{}' as f64 because: {:?}", cleaned, why))
}

/// Drops each `_` that sits between two ASCII digits; any other `_` is kept
/// so the value fails to parse.
fn strip_digit_underscores(s: &str) -> String {
    if !s.contains('_') {
        return s.to_string();
    }

    let chars = s.chars().collect::<Vec<_>>();
    chars
        .iter()
        .enumerate()
        .filter(|&(i, c)| {
            *c != '_'
                || !(i > 0
                    && chars[i - 1].is_ascii_digit()
                    && chars.get(i + 1).is_some_and(char::is_ascii_digit))
        })
        .map(|(_, c)| *c)
        .collect()
}

/// Removes a set of escape characters from a given string.
///
/// # Example
///
/// ```
/// let clean_s = clean_escape_chars("1,234,567", &[',']);
/// assert_eq!(clean_s, "1234567");
/// ```
pub(crate) fn clean_escape_chars(s: &str, escape_chars: &[char]) -> String {
    if escape_chars.is_empty() {
        return s.to_string();
    }

    let filters = escape_chars.iter().collect::<HashSet<_>>();
    s.chars().filter(|c| !filters.contains(c)).collect()
}
