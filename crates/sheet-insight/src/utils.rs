//! Shared utilities for the ingestion pipeline.
//!
//! This module contains helpers used by both the parser and the cleaner, so
//! that the two stages agree on what "numeric-looking" and "unique name" mean.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

// =============================================================================
// Numeric Parsing Utilities
// =============================================================================

// Unsigned integer literals with a radix prefix: 0x1F, 0o17, 0b101
static RADIX_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^0([xXoObB])([0-9a-fA-F]+)$").expect("Invalid regex: radix literal")
});

/// Parse a string as a finite number, the way a loose spreadsheet cell is read.
///
/// Surrounding whitespace is ignored. Accepts decimal literals with optional
/// sign, fraction and exponent (`-1.5e3`, `.5`, `5.`) and unsigned `0x`/`0o`/
/// `0b` integer literals. Anything that is blank, malformed, or does not
/// produce a finite value (`NaN`, `Infinity`, `1e400`) returns `None`.
/// No locale handling: `1,000` and `$5` are not numbers.
///
/// # Example
///
/// ```rust
/// use sheet_insight::utils::parse_finite_number;
///
/// assert_eq!(parse_finite_number(" 42 "), Some(42.0));
/// assert_eq!(parse_finite_number("0x1F"), Some(31.0));
/// assert_eq!(parse_finite_number("Infinity"), None);
/// assert_eq!(parse_finite_number("north"), None);
/// ```
pub fn parse_finite_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(caps) = RADIX_LITERAL.captures(trimmed) {
        let radix = match &caps[1] {
            "x" | "X" => 16,
            "o" | "O" => 8,
            _ => 2,
        };
        return parse_radix_digits(&caps[2], radix);
    }

    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Accumulate digits in a float so long literals degrade to the nearest
/// representable value instead of overflowing.
fn parse_radix_digits(digits: &str, radix: u32) -> Option<f64> {
    digits
        .chars()
        .try_fold(0f64, |acc, c| {
            c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
        })
        .filter(|n| n.is_finite())
}

/// Check if a string would be converted to a number by the cleaner.
pub fn is_numeric_string(s: &str) -> bool {
    parse_finite_number(s).is_some()
}

// =============================================================================
// Naming Utilities
// =============================================================================

/// First of `base`, `base_1`, `base_2`, ... that is not already in `taken`.
pub fn unique_name(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    (1..)
        .map(|i| format!("{}_{}", base, i))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}
