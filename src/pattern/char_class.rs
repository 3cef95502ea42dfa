//! Character universes and the value synthesis shared by bounded nodes.

use std::collections::BTreeSet;

use itertools::Itertools;
use phf::{Map, phf_map};

use super::node::Bounds;

/// A named character class usable inside `[...]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedClass {
    Alpha, // A-Z a-z
    Alnum, // 0-9 A-Z a-z
    Num,   // 0-9
    Hex,   // 0-9 a-f
    Path,  // - . / 0-9 A-Z _ a-z
}

const NAMED_CLASSES: Map<&'static str, NamedClass> = phf_map! {
    "alnum" => NamedClass::Alnum,
    "alpha" => NamedClass::Alpha,
    "hex" => NamedClass::Hex,
    "num" => NamedClass::Num,
    "path" => NamedClass::Path,
};

/// Look up a class keyword.
pub fn named_class(name: &str) -> Option<NamedClass> {
    NAMED_CLASSES.get(name).copied()
}

impl NamedClass {
    /// Inclusive character ranges making up this class.
    pub fn ranges(self) -> &'static [(char, char)] {
        match self {
            Self::Alpha => &[('A', 'Z'), ('a', 'z')],
            Self::Alnum => &[('0', '9'), ('A', 'Z'), ('a', 'z')],
            Self::Num => &[('0', '9')],
            Self::Hex => &[('0', '9'), ('a', 'f')],
            Self::Path => &[('-', '9'), ('A', 'Z'), ('_', '_'), ('a', 'z')],
        }
    }
}

/// The deduplicated set of characters a class node draws from.
///
/// Iteration is in ascending code point order regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Universe {
    chars: BTreeSet<char>,
}

impl Universe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ch: char) {
        self.chars.insert(ch);
    }

    /// Insert every character in `lo..=hi`.
    pub fn insert_range(&mut self, lo: char, hi: char) {
        self.chars.extend(lo..=hi);
    }

    pub fn insert_class(&mut self, class: NamedClass) {
        for &(lo, hi) in class.ranges() {
            self.insert_range(lo, hi);
        }
    }

    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }

    /// Each character as a one-character string, in universe order.
    pub fn symbols(&self) -> Vec<String> {
        self.iter().map(String::from).collect_vec()
    }
}

/// Number of strings [`expand`] yields for `symbols` distinct symbols.
///
/// Returns `None` when the count does not fit in a `u64`.
pub fn power_count(symbols: u64, bounds: Bounds) -> Option<u64> {
    match symbols {
        0 => Some(u64::from(bounds.min == 0)),
        1 => Some(u64::from(bounds.max - bounds.min) + 1),
        _ => (bounds.min..=bounds.max).try_fold(0u64, |acc, len| {
            symbols.checked_pow(len).and_then(|n| acc.checked_add(n))
        }),
    }
}

/// Every concatenation of `len` symbols for each `len` in `bounds`, shortest
/// first, each length in lexicographic symbol order (last position fastest).
pub fn expand<S: AsRef<str>>(symbols: &[S], bounds: Bounds) -> Vec<String> {
    let mut values = Vec::new();
    for len in bounds.min..=bounds.max {
        if len == 0 {
            values.push(String::new());
            continue;
        }
        if symbols.is_empty() {
            break;
        }
        values.extend(
            std::iter::repeat_n(symbols.iter(), len as usize)
                .multi_cartesian_product()
                .map(|parts| {
                    parts.iter().fold(String::new(), |mut value, part| {
                        value.push_str(part.as_ref());
                        value
                    })
                }),
        );
    }
    values
}
