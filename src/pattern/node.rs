//! Range nodes: the enumerable segments a mask compiles into.

use crate::error::MaskError;
use crate::limits::Limits;

use super::char_class::Universe;
use super::parser;

/// A `{min,max}` repetition modifier. Absent modifiers mean `{1,1}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: u32,
    pub max: u32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::exactly(1)
    }
}

impl Bounds {
    /// `None` when `min > max`.
    pub fn new(min: u32, max: u32) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    pub fn exactly(n: u32) -> Self {
        Self { min: n, max: n }
    }
}

/// A materialized value list with a cursor over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueList {
    values: Vec<String>,
    cursor: usize,
}

impl ValueList {
    pub(crate) fn new(values: Vec<String>) -> Self {
        Self { values, cursor: 0 }
    }

    fn current(&self) -> &str {
        &self.values[self.cursor]
    }
}

/// `(a|b|c){min,max}`: repetitions of explicit alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternatives {
    pub options: Vec<String>,
    pub bounds: Bounds,
    pub(crate) list: ValueList,
}

/// `[a-z|num]{min,max}`: strings drawn from a character universe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharClass {
    pub universe: Universe,
    pub bounds: Bounds,
    pub(crate) list: ValueList,
}

/// One segment of a compiled mask.
///
/// Every node has at least one value; `count()` always equals
/// `values().len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Literal(String),
    Alternatives(Alternatives),
    CharClass(CharClass),
}

impl Node {
    /// Parse the single node at the start of `text`, returning it together
    /// with the unconsumed remainder.
    pub fn parse(text: &str) -> Result<(Node, &str), MaskError> {
        parser::parse_node(text, &Limits::default())
    }

    pub fn parse_with_limits<'a>(
        text: &'a str,
        limits: &Limits,
    ) -> Result<(Node, &'a str), MaskError> {
        parser::parse_node(text, limits)
    }

    pub fn count(&self) -> u64 {
        self.values().len() as u64
    }

    pub fn values(&self) -> &[String] {
        match self {
            Node::Literal(text) => std::slice::from_ref(text),
            Node::Alternatives(alt) => &alt.list.values,
            Node::CharClass(class) => &class.list.values,
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Node::Literal(_) => None,
            Node::Alternatives(alt) => Some(alt.bounds),
            Node::CharClass(class) => Some(class.bounds),
        }
    }

    /// The currently selected value.
    pub fn current(&self) -> &str {
        match self {
            Node::Literal(text) => text,
            Node::Alternatives(alt) => alt.list.current(),
            Node::CharClass(class) => class.list.current(),
        }
    }

    pub fn cursor(&self) -> usize {
        self.list().map_or(0, |list| list.cursor)
    }

    pub fn reset(&mut self) {
        if let Some(list) = self.list_mut() {
            list.cursor = 0;
        }
    }

    pub fn has_next(&self) -> bool {
        self.list()
            .is_some_and(|list| list.cursor + 1 < list.values.len())
    }

    /// Advance to the next value. Does nothing on the last value.
    pub fn move_next(&mut self) {
        if self.has_next()
            && let Some(list) = self.list_mut()
        {
            list.cursor += 1;
        }
    }

    /// Select value `index`; callers keep `index < count()`.
    pub(crate) fn set_cursor(&mut self, index: usize) {
        if let Some(list) = self.list_mut() {
            debug_assert!(index < list.values.len());
            list.cursor = index;
        }
    }

    /// Byte length of the longest value.
    pub fn max_len(&self) -> usize {
        self.values().iter().map(String::len).max().unwrap_or(0)
    }

    /// Write the current value into `buf` at `offset` and return the offset
    /// just past it. The buffer is never resized.
    pub fn apply(&self, buf: &mut [u8], offset: usize) -> Result<usize, MaskError> {
        let bytes = self.current().as_bytes();
        let end = offset
            .checked_add(bytes.len())
            .filter(|&end| end <= buf.len())
            .ok_or(MaskError::BufferTooSmall {
                offset,
                needed: bytes.len(),
                capacity: buf.len(),
            })?;
        buf[offset..end].copy_from_slice(bytes);
        Ok(end)
    }

    fn list(&self) -> Option<&ValueList> {
        match self {
            Node::Literal(_) => None,
            Node::Alternatives(alt) => Some(&alt.list),
            Node::CharClass(class) => Some(&class.list),
        }
    }

    fn list_mut(&mut self) -> Option<&mut ValueList> {
        match self {
            Node::Literal(_) => None,
            Node::Alternatives(alt) => Some(&mut alt.list),
            Node::CharClass(class) => Some(&mut class.list),
        }
    }
}
