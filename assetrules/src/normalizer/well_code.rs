use super::{NormalizationResult, strip_non_alphanumeric};

/// Minimum leading letters needed to form a well prefix.
pub const PREFIX_LEN: usize = 4;
/// Minimum trailing digits a well code must carry.
pub const MIN_DIGITS: usize = 3;

/// Normalizes a well code to its four-letter uppercase prefix followed by
/// every trailing digit.
///
/// Codes without enough leading letters or trailing digits are left alone.
pub fn normalize_well_code(raw: &str) -> NormalizationResult {
    if raw.trim().is_empty() {
        return NormalizationResult::Unchanged;
    }

    let cleaned = strip_non_alphanumeric(raw);
    let letters: String = cleaned.chars().take_while(char::is_ascii_alphabetic).collect();
    if letters.len() < PREFIX_LEN {
        return NormalizationResult::Unchanged;
    }

    let digit_count = cleaned.chars().rev().take_while(char::is_ascii_digit).count();
    if digit_count < MIN_DIGITS {
        return NormalizationResult::Unchanged;
    }
    let digits = &cleaned[cleaned.len() - digit_count..];

    let mut normalized = letters[..PREFIX_LEN].to_ascii_uppercase();
    normalized.push_str(digits);
    NormalizationResult::replace_if_changed(raw, normalized)
}
