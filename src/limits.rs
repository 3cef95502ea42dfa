/// Construction-time bounds on how large a compiled mask may get.
///
/// Both bounds are checked before any value list is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Largest value list a single alternatives or class node may expand to.
    pub max_node_values: u64,
    /// Largest total number of combinations for a whole pattern.
    pub max_total: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_node_values: 1 << 24,
            max_total: u64::MAX,
        }
    }
}

impl Limits {
    pub fn unbounded() -> Self {
        Self {
            max_node_values: u64::MAX,
            max_total: u64::MAX,
        }
    }
}
