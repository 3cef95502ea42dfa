//! Mask compiler and combinatorial enumerator.
//!
//! A mask mixes literal text with bounded groups. Each segment becomes a
//! [`Node`]; a [`Pattern`] drives the nodes as an odometer and emits one
//! string per combination.
//!
//! # Mask syntax
//!
//! | Token            | Meaning                                          |
//! |------------------|--------------------------------------------------|
//! | `text`           | Literal text, up to the next `(`, `[` or `{`     |
//! | `(a\|b\|c)`      | One of the listed alternatives                   |
//! | `[x-y]`          | One character from `x` to `y` inclusive          |
//! | `[c]`            | The single character `c`                         |
//! | `[abc]`          | The letters `a`, `b` and `c`                     |
//! | `[\c]`           | The character `c` verbatim, e.g. `[\]\-]`        |
//! | `[alpha]`        | `A-Z a-z`                                        |
//! | `[alnum]`        | `0-9 A-Z a-z`                                    |
//! | `[num]`          | `0-9`                                            |
//! | `[hex]`          | `0-9 a-f`                                        |
//! | `[path]`         | `- . / 0-9 A-Z _ a-z`                            |
//! | `[a-f\|num]`     | Union of class items (`\|` is optional)          |
//! | `{n}`            | Exactly `n` repetitions of the preceding group   |
//! | `{n,m}`          | Between `n` and `m` repetitions                  |
//!
//! A run of letters inside a class is a keyword only when it names one.
//! Outside a class `\` is an ordinary character, so `C:\logs\[num]` is a
//! literal `C:\logs\` followed by one digit.
//!
//! Repetitions expand shortest first; within one length, strings are in
//! lexicographic order of the group's values. Later segments vary fastest.

pub mod char_class;
pub mod node;
pub mod odometer;
pub mod parser;

#[cfg(test)]
mod tests;

pub use char_class::{NamedClass, Universe};
pub use node::{Alternatives, Bounds, CharClass, Node};
pub use odometer::{Combinations, Partition, Pattern};
