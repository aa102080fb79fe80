//! Value comparator
//!
//! Normalizes a CSS value string into a canonical form so that two values
//! differing only by whitespace, case, vendor prefixes, or directional
//! gradient keywords compare equal. Normalization is pure, so results are
//! memoized process-wide by exact input string.

use std::sync::{Mutex, PoisonError};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use rustc_hash::FxHashMap;

use crate::vendor::devendorize;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

// A single space whose neighbors are separators (dot, newline, or a string
// boundary) rather than identifier characters.
static SEPARATOR_GAP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|[.\n]) ([.\n]|$)").unwrap());

static DIRECTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:to (?:left|right|top|bottom)|from (?:left|right|top|bottom))\b").unwrap()
});

static NORMALIZE_CACHE: Lazy<Mutex<FxHashMap<String, String>>> =
    Lazy::new(|| Mutex::new(FxHashMap::default()));

// Gradient direction keywords used by different vendors express the same
// visual result with inverted or renamed keywords; both spellings must
// normalize to the same canonical word.
fn direction_alias(phrase: &str) -> &'static str {
    match phrase {
        "to left" => "right",
        "to right" => "left",
        "to top" => "bottom",
        "to bottom" => "top",
        "from left" => "left",
        "from right" => "right",
        "from top" => "top",
        "from bottom" => "bottom",
        _ => "",
    }
}

fn is_identifier_char(s: &str) -> bool {
    s.len() == 1 && matches!(s.as_bytes()[0], b'a'..=b'z' | b'0'..=b'9' | b'_')
}

/// Canonicalize `value` for equality testing.
///
/// Trims and collapses whitespace, strips vendor prefixes, drops spaces
/// adjacent to separator characters, lower-cases, and rewrites directional
/// gradient keywords. A missing value should be passed as the empty
/// string; it normalizes to itself.
pub fn normalize_for_comparison(value: &str) -> String {
    if let Some(hit) = NORMALIZE_CACHE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(value)
    {
        return hit.clone();
    }

    let collapsed = WHITESPACE_RE.replace_all(value.trim(), " ");
    let devendored = devendorize(&collapsed);
    let gapless = SEPARATOR_GAP_RE.replace_all(&devendored, |caps: &Captures| {
        let before = caps.get(1).map_or("", |m| m.as_str());
        let after = caps.get(2).map_or("", |m| m.as_str());
        if is_identifier_char(before) && is_identifier_char(after) {
            caps[0].to_string()
        } else {
            format!("{before}{after}")
        }
    });
    let lowered = gapless.to_lowercase();
    let result = DIRECTION_RE
        .replace_all(&lowered, |caps: &Captures| direction_alias(&caps[0]).to_string())
        .into_owned();

    NORMALIZE_CACHE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(value.to_string(), result.clone());
    result
}

/// True iff both values normalize to the same canonical form.
pub fn values_equivalent(a: &str, b: &str) -> bool {
    normalize_for_comparison(a) == normalize_for_comparison(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_and_case() {
        assert!(values_equivalent("  scale( 1 )", "scale( 1 )"));
        assert!(values_equivalent("RED", "red"));
        assert!(values_equivalent("1px   solid\nred", "1px solid red"));
    }

    #[test]
    fn test_vendor_prefix_equivalence() {
        assert!(values_equivalent("-webkit-transform 1s", "transform 1s"));
        assert!(values_equivalent(
            "-moz-linear-gradient(red, blue)",
            "linear-gradient(red, blue)"
        ));
        assert!(!values_equivalent("transform 1s", "transform 2s"));
    }

    #[test]
    fn test_directional_aliasing() {
        assert!(values_equivalent(
            "linear-gradient(to left, red, blue)",
            "linear-gradient(right, red, blue)"
        ));
        assert!(values_equivalent("to top", "bottom"));
        assert!(values_equivalent("from left", "left"));
        assert!(!values_equivalent("to left", "to right"));
    }

    #[test]
    fn test_direction_keyword_needs_boundary() {
        // "auto left" must not be rewritten through its "to left" substring
        assert!(!values_equivalent("auto left", "right"));
    }

    #[test]
    fn test_empty_value() {
        assert_eq!(normalize_for_comparison(""), "");
        assert!(values_equivalent("", "   "));
    }

    #[test]
    fn test_memoization_is_stable() {
        let first = normalize_for_comparison("-webkit-transform  SCALE(2)");
        let second = normalize_for_comparison("-webkit-transform  SCALE(2)");
        assert_eq!(first, second);
        assert_eq!(first, "transform scale(2)");
    }
}
