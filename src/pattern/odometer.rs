//! Compiled masks and the odometer that enumerates them.
//!
//! Nodes are digits of a mixed-radix counter. The last node is the least
//! significant digit, so later mask segments vary fastest.

use std::ops::Range;

use log::{debug, trace, warn};

use crate::error::MaskError;
use crate::limits::Limits;
use crate::transport::Bucket;

use super::node::Node;
use super::parser;

/// Totals at or above this are reported when a pattern is built.
const LARGE_TOTAL: u64 = 1 << 32;

/// A compiled mask.
///
/// Node cursors are mutable state: one `Pattern` must not be enumerated by
/// several callers at once. Give each worker its own `Pattern` and one
/// [`Pattern::chunk`].
#[derive(Debug, Clone)]
pub struct Pattern {
    nodes: Vec<Node>,
    total: u64,
    max_len: usize,
}

impl Pattern {
    pub fn new(mask: &str) -> Result<Self, MaskError> {
        Self::with_limits(mask, Limits::default())
    }

    pub fn with_limits(mask: &str, limits: Limits) -> Result<Self, MaskError> {
        let (nodes, total) = parser::parse(mask, &limits)?;
        let max_len = nodes.iter().map(Node::max_len).sum();
        if total >= LARGE_TOTAL {
            warn!("mask {mask:?} expands to {total} combinations");
        }
        debug!(
            "compiled {mask:?}: {} node(s), {total} combination(s), up to {max_len} byte(s) each",
            nodes.len()
        );
        Ok(Self {
            nodes,
            total,
            max_len,
        })
    }

    /// Total number of combinations: the product of every node's count.
    pub fn count(&self) -> u64 {
        self.total
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Byte length of the longest string the pattern can produce.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Put every node back on its first value.
    pub fn reset(&mut self) {
        self.nodes.iter_mut().for_each(Node::reset);
    }

    /// Write the current combination into `buf` from offset 0 and return its
    /// length.
    pub fn apply(&self, buf: &mut [u8]) -> Result<usize, MaskError> {
        self.nodes
            .iter()
            .try_fold(0, |offset, node| node.apply(buf, offset))
    }

    /// The current combination as a string.
    pub fn current(&self) -> String {
        self.nodes.iter().map(Node::current).collect()
    }

    /// Step to the next combination. Returns `false`, with every node reset,
    /// once the carry runs past the first node.
    pub fn advance(&mut self) -> bool {
        for node in self.nodes.iter_mut().rev() {
            if node.has_next() {
                node.move_next();
                return true;
            }
            node.reset();
        }
        false
    }

    /// Position the node cursors on combination `index`.
    pub fn seek(&mut self, index: u64) -> Result<(), MaskError> {
        if index >= self.total {
            return Err(MaskError::IndexOutOfRange {
                index,
                count: self.total,
            });
        }
        let mut rem = index;
        for node in self.nodes.iter_mut().rev() {
            let count = node.count();
            node.set_cursor((rem % count) as usize);
            rem /= count;
        }
        Ok(())
    }

    /// Emit every combination into `bucket`, in canonical order. Returns the
    /// number of units emitted, which always equals [`Pattern::count`].
    pub fn collect<B: Bucket + ?Sized>(&mut self, bucket: &mut B) -> Result<u64, MaskError> {
        self.reset();
        self.emit(bucket, self.total)
    }

    /// Emit combinations `range.start..range.end` into `bucket`.
    ///
    /// The node cursors are left wherever the range ended.
    pub fn collect_range<B: Bucket + ?Sized>(
        &mut self,
        range: Range<u64>,
        bucket: &mut B,
    ) -> Result<u64, MaskError> {
        if range.end > self.total {
            return Err(MaskError::IndexOutOfRange {
                index: range.end,
                count: self.total,
            });
        }
        if range.is_empty() {
            return Ok(0);
        }
        self.seek(range.start)?;
        self.emit(bucket, range.end - range.start)
    }

    /// Range `index` (0-based) of `0..count()` split into `parts` contiguous
    /// ranges whose lengths differ by at most one. The first
    /// `count() % parts` ranges are one longer; ranges are empty when
    /// `parts > count()`. A `parts` of zero is treated as one.
    pub fn chunk(&self, index: u64, parts: u64) -> Result<Range<u64>, MaskError> {
        let parts = parts.max(1);
        if index >= parts {
            return Err(MaskError::IndexOutOfRange {
                index,
                count: parts,
            });
        }
        Ok(chunk_range(self.total, index, parts))
    }

    /// Every range of [`Pattern::chunk`] in order. Lazy, so `parts` may be
    /// far larger than memory.
    pub fn partition(&self, parts: u64) -> Partition {
        Partition {
            total: self.total,
            parts: parts.max(1),
            next: 0,
        }
    }

    /// Lazily yield every combination without touching the node cursors.
    pub fn combinations(&self) -> Combinations<'_> {
        Combinations {
            nodes: &self.nodes,
            digits: vec![0; self.nodes.len()],
            total: self.total,
            remaining: self.total,
        }
    }

    fn emit<B: Bucket + ?Sized>(&mut self, bucket: &mut B, units: u64) -> Result<u64, MaskError> {
        let mut buf = vec![0u8; self.max_len];
        bucket.reserve(units, self.max_len);
        let mut emitted = 0;
        while emitted < units {
            let len = self.apply(&mut buf)?;
            trace!("emit {:?}", String::from_utf8_lossy(&buf[..len]));
            bucket.push(&buf[..len]);
            emitted += 1;
            if !self.advance() {
                break;
            }
        }
        debug!("emitted {emitted} unit(s)");
        Ok(emitted)
    }
}

fn chunk_range(total: u64, index: u64, parts: u64) -> Range<u64> {
    let base = total / parts;
    let extra = total % parts;
    // index < parts, so index * base <= total
    let start = index * base + index.min(extra);
    start..start + base + u64::from(index < extra)
}

/// Iterator over the ranges of [`Pattern::partition`].
#[derive(Debug, Clone)]
pub struct Partition {
    total: u64,
    parts: u64,
    next: u64,
}

impl Iterator for Partition {
    type Item = Range<u64>;

    fn next(&mut self) -> Option<Range<u64>> {
        if self.next == self.parts {
            return None;
        }
        let range = chunk_range(self.total, self.next, self.parts);
        self.next += 1;
        Some(range)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = usize::try_from(self.parts - self.next).unwrap_or(usize::MAX);
        (len, Some(len))
    }
}

/// Iterator over a pattern's combinations, in the same order as
/// [`Pattern::collect`].
#[derive(Debug, Clone)]
pub struct Combinations<'a> {
    nodes: &'a [Node],
    digits: Vec<usize>,
    total: u64,
    remaining: u64,
}

impl Combinations<'_> {
    fn step(&mut self) {
        for (digit, node) in self.digits.iter_mut().zip(self.nodes).rev() {
            if (*digit as u64) + 1 < node.count() {
                *digit += 1;
                return;
            }
            *digit = 0;
        }
    }

    fn jump_to(&mut self, index: u64) {
        let mut rem = index;
        for (digit, node) in self.digits.iter_mut().zip(self.nodes).rev() {
            let count = node.count();
            *digit = (rem % count) as usize;
            rem /= count;
        }
    }
}

impl Iterator for Combinations<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.remaining == 0 {
            return None;
        }
        let value = self
            .digits
            .iter()
            .zip(self.nodes)
            .map(|(&digit, node)| node.values()[digit].as_str())
            .collect();
        self.remaining -= 1;
        self.step();
        Some(value)
    }

    fn nth(&mut self, n: usize) -> Option<String> {
        let n = n as u64;
        if n >= self.remaining {
            self.remaining = 0;
            return None;
        }
        if n > 0 {
            self.jump_to(self.total - self.remaining + n);
            self.remaining -= n;
        }
        self.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (len, Some(len))
    }
}

impl ExactSizeIterator for Combinations<'_> {}
