/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Korean phone number canonicalization.
//!
//! Users type phone numbers in many shapes (`01012345678`, `010-1234-5678`,
//! `+82 10-1234-5678`, `+010...`). Storage and duplicate detection use a single
//! international form (`+82 10 1234 5678`); the UI shows the local form
//! (`010-1234-5678`).
//!
//! Normalization never fails: input that matches no known shape is passed
//! through unchanged and a warning is logged.

use once_cell::sync::Lazy;
use regex::Regex;

const COUNTRY_PREFIX: &str = "+82";

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\-()]").unwrap());

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s").unwrap());

/// Mobile (`10`) or a one/two digit area code, followed by the subscriber number.
static KOREAN_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(10|2|[3-9][0-9])[0-9]{7,8}$").unwrap());

/// Result of [`normalize_outcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// The input matched a known shape and was rewritten to international form.
    Formatted(String),
    /// The input was not recognized and is returned as-is.
    PassedThrough(String),
}

impl Normalized {
    pub fn is_formatted(&self) -> bool {
        matches!(self, Normalized::Formatted(_))
    }

    pub fn into_string(self) -> String {
        match self {
            Normalized::Formatted(s) | Normalized::PassedThrough(s) => s,
        }
    }
}

/// Convert a user-supplied phone number to the canonical international form.
///
/// ```
/// use user_api::phone::normalize;
/// assert_eq!(normalize("010-1234-5678"), "+82 10 1234 5678");
/// ```
pub fn normalize(raw: &str) -> String {
    normalize_outcome(raw).into_string()
}

/// Like [`normalize`], but reports whether the input was recognized.
pub fn normalize_outcome(raw: &str) -> Normalized {
    if raw.trim().is_empty() {
        return Normalized::PassedThrough(raw.to_string());
    }

    // `+010...` is a common mis-entry: the user typed `+` in front of a local number.
    let input = match raw.strip_prefix("+0") {
        Some(rest) => {
            tracing::info!("Correcting mistyped phone prefix: {raw} -> {rest}");
            rest
        }
        None => raw,
    };

    let cleaned = SEPARATORS.replace_all(input, "");

    if cleaned.starts_with(COUNTRY_PREFIX) {
        return Normalized::Formatted(format_international_number(&cleaned));
    }
    if cleaned.starts_with("82") {
        return Normalized::Formatted(format_international_number(&format!("+{cleaned}")));
    }
    if let Some(local) = cleaned.strip_prefix('0') {
        return Normalized::Formatted(format_international_number(&format!(
            "{COUNTRY_PREFIX}{local}"
        )));
    }
    // A local number that lost its leading zero.
    if (cleaned.len() == 10 || cleaned.len() == 11) && cleaned.bytes().all(|b| b.is_ascii_digit())
    {
        return Normalized::Formatted(format_international_number(&format!(
            "{COUNTRY_PREFIX}{cleaned}"
        )));
    }

    tracing::warn!("Unrecognized phone number format, storing as-is: {input}");
    Normalized::PassedThrough(input.to_string())
}

/// Space-separate a compact `+82` number by prefix family.
///
/// Strings shorter than 12 characters are returned unmodified.
pub fn format_international_number(international: &str) -> String {
    if international.chars().count() < 12 {
        return international.to_string();
    }
    let Some(number_part) = international.strip_prefix(COUNTRY_PREFIX) else {
        return international.to_string();
    };

    // Seoul (`2`) has a one digit area code; mobile (`10`) and the rest use two.
    let head_len = if number_part.starts_with('2') { 1 } else { 2 };

    match split_groups(number_part, head_len, head_len + 4) {
        Some((head, mid, tail)) => format!("{COUNTRY_PREFIX} {head} {mid} {tail}"),
        None => international.to_string(),
    }
}

/// Whether the input plausibly represents a Korean phone number.
pub fn is_valid(raw: &str) -> bool {
    if raw.trim().is_empty() {
        return false;
    }
    if raw.starts_with("+0") {
        tracing::warn!("Rejecting phone number with +0 prefix: {raw}");
        return false;
    }

    let cleaned = SEPARATORS.replace_all(raw, "");
    let digits = cleaned
        .strip_prefix(COUNTRY_PREFIX)
        .or_else(|| cleaned.strip_prefix("82"))
        .or_else(|| cleaned.strip_prefix('0'))
        .unwrap_or(&*cleaned);

    KOREAN_NUMBER.is_match(digits)
}

/// Format a canonical `+82` number for display (`010-1234-5678`).
///
/// Anything that does not start with `+82` is returned unchanged.
pub fn to_display_form(international: &str) -> String {
    if !international.starts_with(COUNTRY_PREFIX) {
        return international.to_string();
    }

    let cleaned = WHITESPACE.replace_all(international, "");
    let number_part = &cleaned[COUNTRY_PREFIX.len()..];

    let display = if number_part.starts_with("10") {
        split_groups(number_part, 2, 6).map(|(_, mid, tail)| format!("010-{mid}-{tail}"))
    } else if number_part.starts_with('2') {
        split_groups(number_part, 1, 5).map(|(_, mid, tail)| format!("02-{mid}-{tail}"))
    } else if number_part.starts_with('0') {
        split_groups(number_part, 3, 7).map(|(head, mid, tail)| format!("{head}-{mid}-{tail}"))
    } else {
        split_groups(number_part, 2, 6).map(|(head, mid, tail)| format!("0{head}-{mid}-{tail}"))
    };

    display.unwrap_or_else(|| international.to_string())
}

/// Split `s` at byte offsets `a` and `b`, or `None` when `s` is too short or
/// an offset is not on a character boundary.
fn split_groups(s: &str, a: usize, b: usize) -> Option<(&str, &str, &str)> {
    Some((s.get(..a)?, s.get(a..b)?, s.get(b..)?))
}
