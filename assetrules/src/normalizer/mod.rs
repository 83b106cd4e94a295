//! Identifier normalization for asset codes.
//!
//! Everything in this module is pure: functions take plain values and return
//! a [`NormalizationResult`]. Malformed or absent input is never an error, it
//! simply leaves the code unchanged.

mod rectify;
mod well_code;

pub use rectify::{DIGIT_FILLER, LETTER_FILLER, RECTIFIED_LEN, Segments, rectify, segments};
pub use well_code::normalize_well_code;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::types::{AssetClass, IdentifierKind, ServiceClass};

/// Outcome of normalizing a raw code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "code", rename_all = "snake_case")]
pub enum NormalizationResult {
    Unchanged,
    Replace(String),
}

impl NormalizationResult {
    /// `Replace` unless the candidate is identical to the raw input.
    pub fn replace_if_changed(raw: &str, candidate: String) -> Self {
        if raw == candidate {
            Self::Unchanged
        } else {
            Self::Replace(candidate)
        }
    }

    pub fn replacement(&self) -> Option<&str> {
        match self {
            Self::Unchanged => None,
            Self::Replace(code) => Some(code),
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }
}

/// Letters followed by 3 or 4 digits; the letters are compared to the
/// expected prefix separately.
static SHORT_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<prefix>[A-Za-z]+)\d{3,4}$").expect("short-code pattern compiles"));

/// Normalizes `raw` for the identifier field selected by the classifiers.
///
/// Blank input and short codes for the resolved kind are kept as entered.
/// Otherwise flowline codes are rectified, well codes get the prefix/digits
/// rule, and every other kind is left untouched.
pub fn normalize(raw: &str, asset: Option<AssetClass>, service: Option<ServiceClass>) -> NormalizationResult {
    let Some(kind) = IdentifierKind::resolve(asset, service) else {
        return NormalizationResult::Unchanged;
    };
    if raw.trim().is_empty() || is_short_code(raw, kind.prefix()) {
        return NormalizationResult::Unchanged;
    }
    match kind {
        IdentifierKind::Flowline => NormalizationResult::replace_if_changed(raw, rectify(raw)),
        IdentifierKind::Well => normalize_well_code(raw),
        _ => NormalizationResult::Unchanged,
    }
}

/// Returns `true` when `code` is exactly `<prefix>` followed by 3 or 4 digits,
/// ignoring case.
pub fn is_short_code(code: &str, prefix: &str) -> bool {
    SHORT_CODE
        .captures(code)
        .and_then(|caps| caps.name("prefix"))
        .is_some_and(|found| found.as_str().eq_ignore_ascii_case(prefix))
}

/// Drops every character that is not an ASCII letter or digit.
pub fn strip_non_alphanumeric(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// [`strip_non_alphanumeric`] followed by ASCII uppercasing.
pub fn clean_code(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
