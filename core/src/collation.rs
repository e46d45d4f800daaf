//! Name ordering for user-facing lists.
//!
//! Names compare on their base letters first, so accents and case never push
//! a name out of its alphabetical position. Ties are then broken the way a
//! default collator does: unaccented before accented, lowercase before
//! uppercase, and finally the raw strings so the order is total.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn accented(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

fn uppercase_marks(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.nfd().filter(|c| c.is_alphabetic()).map(char::is_uppercase)
}

#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| accented(a).cmp(accented(b)))
        .then_with(|| uppercase_marks(a).cmp(uppercase_marks(b)))
        .then_with(|| a.cmp(b))
}
