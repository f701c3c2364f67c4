//! Stat token classifier.
//!
//! Decides whether a raw OCR fragment looks like a basketball statistic.
//! Pure and deterministic; the shapes are checked in a fixed order and the
//! first match wins.

use regex::Regex;
use std::sync::OnceLock;

/// Pattern for made/attempts (e.g. "27/70", "5/12")
const MADE_ATTEMPTS_PATTERN: &str = r"^(\d+)/(\d+)$";

/// Pattern for percentages (e.g. "38.6%", "45%")
const PERCENTAGE_PATTERN: &str = r"^\d+\.?\d*%$";

/// Pattern for decimals without the % glyph (some charts omit it)
const DECIMAL_PATTERN: &str = r"^\d+\.\d+$";

/// Pattern for bare counts; length-limited below to exclude numbers too
/// large to be shot counts
const COUNT_PATTERN: &str = r"^\d+$";

/// Maximum digit count for a bare number to be treated as a shot count.
const MAX_COUNT_DIGITS: usize = 3;

/// A recognized statistic shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatToken {
    /// "27/70": made shots over attempts
    MadeAttempts { made: u32, attempts: u32 },
    /// "38.6%": a shooting percentage with the % glyph
    Percentage(f64),
    /// "N/A" or "NA" in any case, marking explicit absence of data
    NotAvailable,
    /// "38.6": a decimal with no %, kept distinct from Percentage because
    /// some charts render percentages without the glyph
    Decimal(f64),
    /// "27": a bare count of up to three digits
    Count(u32),
}

fn made_attempts_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(MADE_ATTEMPTS_PATTERN).unwrap())
}

fn percentage_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PERCENTAGE_PATTERN).unwrap())
}

fn decimal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DECIMAL_PATTERN).unwrap())
}

fn count_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(COUNT_PATTERN).unwrap())
}

/// Classifies a raw text fragment, returning `None` for anything that does
/// not look like a basketball statistic (including empty text).
pub fn classify(text: &str) -> Option<StatToken> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(caps) = made_attempts_re().captures(text) {
        let made: u32 = caps[1].parse().ok()?;
        let attempts: u32 = caps[2].parse().ok()?;
        return Some(StatToken::MadeAttempts { made, attempts });
    }

    if percentage_re().is_match(text) {
        let value: f64 = text.trim_end_matches('%').parse().ok()?;
        return Some(StatToken::Percentage(value));
    }

    if text.eq_ignore_ascii_case("na") || text.eq_ignore_ascii_case("n/a") {
        return Some(StatToken::NotAvailable);
    }

    if decimal_re().is_match(text) {
        let value: f64 = text.parse().ok()?;
        return Some(StatToken::Decimal(value));
    }

    if count_re().is_match(text) && text.len() <= MAX_COUNT_DIGITS {
        let value: u32 = text.parse().ok()?;
        return Some(StatToken::Count(value));
    }

    None
}

/// True if the text is any recognized statistic shape.
pub fn is_basketball_stat(text: &str) -> bool {
    classify(text).is_some()
}
