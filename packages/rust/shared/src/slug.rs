//! Slug derivation shared by post ids, hub ids, and cross-link configuration.
//!
//! Cross-link files refer to posts by slug, so this function is the only
//! place the normalization rule may live. A drift here silently drops
//! user-authored edges instead of raising an error.

use std::sync::LazyLock;

use regex::Regex;

/// Slug used when normalization leaves nothing behind (e.g. a title of `"???"`).
pub const EMPTY_SLUG: &str = "untitled";

/// Matches runs of anything that is not an ASCII letter or digit.
static NON_ALNUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("non-alnum regex"));

/// Convert arbitrary text into a lowercase, hyphen-separated identifier.
///
/// Lowercases, replaces every run of non-alphanumeric characters with a
/// single `-`, then strips leading and trailing hyphens.
///
/// Only ASCII letters and digits survive, so a title written entirely in a
/// non-Latin script (CJK, Cyrillic, ...) becomes [`EMPTY_SLUG`]. Two such
/// posts in one feed share that id and fail graph building as a duplicate.
///
/// ```
/// use lattice_shared::slugify;
///
/// assert_eq!(slugify("Kelly Criterion"), "kelly-criterion");
/// assert_eq!(slugify("  Bayes' Theorem!! "), "bayes-theorem");
/// assert_eq!(slugify("kelly-criterion"), "kelly-criterion");
/// assert_eq!(slugify("凯利公式"), "untitled");
/// ```
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let slug = NON_ALNUM_RE.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        slug.to_string()
    }
}
