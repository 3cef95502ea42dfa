//! Errors raised while compiling or driving a mask.

use std::fmt;

/// Why a mask failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// `(` without a matching `)`.
    UnclosedAlternatives,
    /// `[` without a matching `]`.
    UnclosedClass,
    /// `{` without a matching `}`.
    UnclosedModifier,
    /// A modifier bound that is not a decimal `u32`.
    InvalidNumber,
    /// `()`.
    EmptyAlternatives,
    /// `[]`.
    EmptyClass,
    /// A class keyword that is not one of `alpha`, `alnum`, `num`, `hex`, `path`.
    UnknownClass(String),
    UnexpectedChar(char),
    UnexpectedEnd,
    /// A `{…}` modifier with no alternatives or class in front of it.
    StrayModifier,
    /// A `\` inside a class with nothing after it.
    DanglingEscape,
    /// A class range such as `z-a`.
    InvertedCharRange(char, char),
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnclosedAlternatives => write!(f, "unclosed alternatives '('"),
            Self::UnclosedClass => write!(f, "unclosed character class '['"),
            Self::UnclosedModifier => write!(f, "unclosed modifier '{{'"),
            Self::InvalidNumber => write!(f, "invalid number in modifier"),
            Self::EmptyAlternatives => write!(f, "empty alternatives list"),
            Self::EmptyClass => write!(f, "empty character class"),
            Self::UnknownClass(name) => write!(f, "unknown character class {name:?}"),
            Self::UnexpectedChar(c) => write!(f, "unexpected character {c:?}"),
            Self::UnexpectedEnd => write!(f, "unexpected end of mask"),
            Self::StrayModifier => write!(f, "modifier without a preceding group"),
            Self::DanglingEscape => write!(f, "escape '\\' at end of mask inside a class"),
            Self::InvertedCharRange(lo, hi) => {
                write!(f, "character range {lo:?}-{hi:?} is inverted")
            }
        }
    }
}

/// Coarse classification of a [`MaskError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Range,
    Overflow,
    BufferTooSmall,
}

/// Errors that can occur while compiling a mask or emitting its strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    /// Malformed mask text. `position` is a byte offset into the mask.
    Syntax { position: usize, reason: SyntaxError },
    /// A `{min,max}` modifier with `min > max`.
    InvertedBounds { position: usize, min: u32, max: u32 },
    /// A character class that contributes no characters.
    EmptyUniverse { position: usize },
    /// The number of combinations is not representable, or exceeds the limits.
    Overflow { position: usize },
    /// A node's value does not fit in the destination buffer.
    BufferTooSmall {
        offset: usize,
        needed: usize,
        capacity: usize,
    },
    /// A combination index at or past the total count.
    IndexOutOfRange { index: u64, count: u64 },
}

impl MaskError {
    pub(crate) fn syntax(position: usize, reason: SyntaxError) -> Self {
        Self::Syntax { position, reason }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Syntax { .. } => ErrorKind::Syntax,
            Self::InvertedBounds { .. } | Self::EmptyUniverse { .. } => ErrorKind::Range,
            Self::IndexOutOfRange { .. } => ErrorKind::Range,
            Self::Overflow { .. } => ErrorKind::Overflow,
            Self::BufferTooSmall { .. } => ErrorKind::BufferTooSmall,
        }
    }

    /// Shift a node-local position by `base` bytes.
    pub(crate) fn offset_by(self, base: usize) -> Self {
        match self {
            Self::Syntax { position, reason } => Self::Syntax {
                position: position + base,
                reason,
            },
            Self::InvertedBounds { position, min, max } => Self::InvertedBounds {
                position: position + base,
                min,
                max,
            },
            Self::EmptyUniverse { position } => Self::EmptyUniverse {
                position: position + base,
            },
            Self::Overflow { position } => Self::Overflow {
                position: position + base,
            },
            other => other,
        }
    }
}

impl fmt::Display for MaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax { position, reason } => {
                write!(f, "syntax error at byte {position}: {reason}")
            }
            Self::InvertedBounds { position, min, max } => {
                write!(f, "modifier at byte {position} has min {min} > max {max}")
            }
            Self::EmptyUniverse { position } => {
                write!(f, "character class at byte {position} is empty")
            }
            Self::Overflow { position } => {
                write!(f, "combination count overflows at byte {position}")
            }
            Self::BufferTooSmall {
                offset,
                needed,
                capacity,
            } => write!(
                f,
                "buffer too small: {needed} bytes at offset {offset} exceed capacity {capacity}"
            ),
            Self::IndexOutOfRange { index, count } => {
                write!(f, "combination index {index} out of range (count {count})")
            }
        }
    }
}

impl std::error::Error for MaskError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let e = MaskError::syntax(3, SyntaxError::EmptyClass);
        assert_eq!(e.kind(), ErrorKind::Syntax);
        let e = MaskError::InvertedBounds {
            position: 0,
            min: 3,
            max: 1,
        };
        assert_eq!(e.kind(), ErrorKind::Range);
        assert_eq!(MaskError::Overflow { position: 0 }.kind(), ErrorKind::Overflow);
    }

    #[test]
    fn test_offset_by_shifts_positions_only() {
        let e = MaskError::syntax(2, SyntaxError::UnclosedClass).offset_by(10);
        assert_eq!(e, MaskError::syntax(12, SyntaxError::UnclosedClass));
        let e = MaskError::IndexOutOfRange { index: 5, count: 3 }.offset_by(10);
        assert_eq!(e, MaskError::IndexOutOfRange { index: 5, count: 3 });
    }

    #[test]
    fn test_display_includes_position() {
        let e = MaskError::syntax(7, SyntaxError::UnknownClass("greek".into()));
        assert_eq!(
            e.to_string(),
            "syntax error at byte 7: unknown character class \"greek\""
        );
    }
}
