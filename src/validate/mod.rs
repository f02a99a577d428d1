//! Stateless field checks applied before anything is written.

use regex::Regex;
use std::sync::LazyLock;

pub(crate) const DEFAULT_MAX_LEN: usize = 100;

#[allow(clippy::expect_used)]
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.+\-]+@[A-Za-z0-9\-]+\.[A-Za-z0-9.\-]+$").expect("email pattern")
});

#[allow(clippy::expect_used)]
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(?\d{2}\)?[\s-]?\d{4,5}-?\d{4}$").expect("phone pattern"));

pub(crate) fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

pub(crate) fn is_valid_phone(s: &str) -> bool {
    PHONE_RE.is_match(s)
}

/// Trim surrounding whitespace. Statements are parametrized, so nothing else
/// needs escaping.
pub(crate) fn sanitize(s: &str) -> &str {
    s.trim()
}

/// Non-empty and at most `max_len` characters.
pub(crate) fn is_present(s: &str, max_len: usize) -> bool {
    !s.is_empty() && s.chars().count() <= max_len
}

/// Render phone input as `(XX) X XXXX-XXXX`, keeping only the groups the
/// digits typed so far reach. Non-digits are dropped and so is anything past
/// the eleventh digit, which makes the function idempotent.
///
/// e.g. `"1198"` → `"(11) 9 8"`, `"11987654321"` → `"(11) 9 8765-4321"`
pub(crate) fn format_phone(input: &str) -> String {
    let digits: Vec<char> = input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(11)
        .collect();
    let group = |from: usize, to: usize| -> String {
        digits[from.min(digits.len())..to.min(digits.len())]
            .iter()
            .collect()
    };

    let mut out = String::new();
    if !digits.is_empty() {
        out.push('(');
        out.push_str(&group(0, 2));
    }
    if digits.len() > 2 {
        out.push_str(") ");
        out.push_str(&group(2, 3));
    }
    if digits.len() > 3 {
        out.push(' ');
        out.push_str(&group(3, 7));
    }
    if digits.len() > 7 {
        out.push('-');
        out.push_str(&group(7, 11));
    }
    out
}

/// Normalize a stored phone: recognizable numbers (raw or already grouped)
/// are rendered with [`format_phone`], anything else is kept as typed.
pub(crate) fn normalize_phone(s: &str) -> String {
    let formatted = format_phone(s);
    if is_valid_phone(s) || formatted == s {
        formatted
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests;
