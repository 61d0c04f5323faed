//! Serial number decomposition.
//!
//! A serial number is a symbolic prefix followed by a numeric suffix, e.g.
//! `AB0150` is prefix `AB` with suffix `150`. Passports claim suffix ranges
//! per prefix, so resolution needs both the generic split and a split against
//! a specific candidate prefix.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialNumber {
    pub prefix: String,
    pub suffix: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseSerialError {
    #[error("serial number is empty")]
    Empty,

    #[error("serial number '{0}' has no numeric suffix")]
    MissingSuffix(String),

    #[error("serial number '{0}' has a malformed numeric suffix")]
    InvalidSuffix(String),
}

/// Split `raw` at the end of its leading non-digit run.
pub fn parse(raw: &str) -> Result<SerialNumber, ParseSerialError> {
    if raw.is_empty() {
        return Err(ParseSerialError::Empty);
    }

    let split = raw.find(|c: char| c.is_ascii_digit()).unwrap_or(raw.len());
    let (prefix, rest) = raw.split_at(split);
    if rest.is_empty() {
        return Err(ParseSerialError::MissingSuffix(raw.to_string()));
    }

    let suffix =
        parse_suffix(rest).ok_or_else(|| ParseSerialError::InvalidSuffix(raw.to_string()))?;

    Ok(SerialNumber {
        prefix: prefix.to_string(),
        suffix,
    })
}

/// Non-empty ASCII digits that fit in `i64`. Signs and whitespace are rejected.
pub fn parse_suffix(digits: &str) -> Option<i64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Suffix of `raw` after stripping exactly `prefix`, if the remainder is numeric.
pub fn suffix_after(raw: &str, prefix: &str) -> Option<i64> {
    raw.strip_prefix(prefix).and_then(parse_suffix)
}

/// Non-empty leading parts of `raw` up to `max_chars` long, shortest first.
///
/// These are the only stored prefixes that can govern `raw`.
pub fn leading_prefixes(raw: &str, max_chars: usize) -> Vec<String> {
    raw.char_indices()
        .take(max_chars)
        .map(|(i, c)| raw[..i + c.len_utf8()].to_string())
        .collect()
}
