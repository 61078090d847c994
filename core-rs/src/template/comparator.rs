//! Specificity order over URI templates
//!
//! Ascending order puts the most specific template first:
//! 1. more literal characters first
//! 2. then fewer variables first
//! 3. then the template strings in lexicographic order
//!
//! The last key makes the order total and consistent with `Eq`, so the
//! order never depends on catalog enumeration order.

use super::UriTemplate;
use std::cmp::Ordering;

impl Ord for UriTemplate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .explicit_characters()
            .cmp(&self.explicit_characters())
            .then_with(|| self.variables().cmp(&other.variables()))
            .then_with(|| self.as_str().cmp(other.as_str()))
    }
}

impl PartialOrd for UriTemplate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// `true` when `a` ranks strictly more specific than `b`
pub fn more_specific(a: &UriTemplate, b: &UriTemplate) -> bool {
    a < b
}
