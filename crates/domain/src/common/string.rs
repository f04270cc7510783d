//! String utilities.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Converts an empty (or whitespace-only) string to `None`.
///
/// Host attribute bags frequently store "no value" as an empty string.
///
/// # Examples
///
/// ```
/// use veilkeep_domain::common::none_if_blank;
///
/// assert_eq!(none_if_blank("action"), Some("action"));
/// assert_eq!(none_if_blank(""), None);
/// assert_eq!(none_if_blank("  "), None);
/// ```
pub fn none_if_blank(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Builds the collation key used for ordering display names.
///
/// The key is the canonical decomposition of `name` with combining marks
/// stripped and every remaining character lowercased, so `"Ámber"` and
/// `"amber"` produce the same primary key.
pub fn name_sort_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Compares two display names the way a player reading the list expects.
///
/// Primary ordering ignores case and accents. Ties fall back to the
/// case-folded original (so accented forms sort directly after their bare
/// form) and finally to the raw strings, keeping the ordering total.
pub fn compare_display_names(a: &str, b: &str) -> Ordering {
    name_sort_key(a)
        .cmp(&name_sort_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}
