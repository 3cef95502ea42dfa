//! Sinks that receive generated strings.
//!
//! A [`Bucket`] is append-only: the enumerator pushes one unit per
//! combination and never reads anything back.

/// Reservations are capped at this many units, and packed data at
/// `MAX_RESERVE_BYTES`; larger runs grow as they go.
const MAX_RESERVE: usize = 1 << 16;
const MAX_RESERVE_BYTES: usize = 1 << 24;

fn reserve_units(units: u64) -> usize {
    usize::try_from(units).map_or(MAX_RESERVE, |units| units.min(MAX_RESERVE))
}

/// An append-only collection of transport units.
pub trait Bucket {
    /// Called before a run with the number of units that follow and the
    /// longest unit any of them can be.
    fn reserve(&mut self, _units: u64, _max_len: usize) {}

    fn push(&mut self, unit: &[u8]);
}

impl Bucket for Vec<Vec<u8>> {
    fn reserve(&mut self, units: u64, _max_len: usize) {
        Vec::reserve(self, reserve_units(units));
    }

    fn push(&mut self, unit: &[u8]) {
        Vec::push(self, unit.to_vec());
    }
}

impl Bucket for Vec<String> {
    fn reserve(&mut self, units: u64, _max_len: usize) {
        Vec::reserve(self, reserve_units(units));
    }

    fn push(&mut self, unit: &[u8]) {
        Vec::push(self, String::from_utf8_lossy(unit).into_owned());
    }
}

/// Units packed back to back in fixed-size slots, ready for a single upload.
///
/// Slot `i` occupies `data[i * stride..(i + 1) * stride]`; its first
/// `lengths[i]` bytes are the unit and the rest is zero padding.
///
/// # Panics
///
/// Pushing a unit longer than `u32::MAX` bytes panics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedBuffer {
    stride: usize,
    data: Vec<u8>,
    lengths: Vec<u32>,
}

impl PackedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stride(stride: usize) -> Self {
        Self {
            stride,
            ..Self::default()
        }
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// The packed slots.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn lengths(&self) -> &[u32] {
        &self.lengths
    }

    pub fn get(&self, index: usize) -> Option<&[u8]> {
        let len = *self.lengths.get(index)? as usize;
        let start = index * self.stride;
        Some(&self.data[start..start + len])
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.lengths.clear();
    }

    /// Widen every slot to `stride` bytes.
    fn restride(&mut self, stride: usize) {
        if !self.lengths.is_empty() {
            let mut data = vec![0u8; self.lengths.len() * stride];
            for (old, new) in self
                .data
                .chunks_exact(self.stride.max(1))
                .zip(data.chunks_exact_mut(stride))
            {
                new[..old.len()].copy_from_slice(old);
            }
            self.data = data;
        }
        self.stride = stride;
    }
}

impl Bucket for PackedBuffer {
    fn reserve(&mut self, units: u64, max_len: usize) {
        if max_len > self.stride {
            self.restride(max_len);
        }
        let units = reserve_units(units);
        self.lengths.reserve(units);
        self.data
            .reserve(units.saturating_mul(self.stride).min(MAX_RESERVE_BYTES));
    }

    fn push(&mut self, unit: &[u8]) {
        if unit.len() > self.stride {
            self.restride(unit.len());
        }
        self.data.extend_from_slice(unit);
        self.data
            .resize(self.data.len() + self.stride - unit.len(), 0);
        let len = u32::try_from(unit.len()).expect("unit longer than u32::MAX bytes");
        self.lengths.push(len);
    }
}
