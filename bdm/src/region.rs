use std::ops::Range;

use crate::error::Error;

/// Highest exclusive end of a region on a 32-bit address bus.
const ADDRESS_SPACE_END: u64 = 1 << 32;

/// A half-open byte range `[start, end)` of target memory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoryRegion {
    range: Range<u64>,
}

impl MemoryRegion {
    /// Create a region, rejecting empty or inverted ranges and ends beyond the
    /// 32-bit address space.
    pub fn new(start: u64, end: u64) -> Result<Self, Error> {
        if start >= end || end > ADDRESS_SPACE_END {
            return Err(Error::InvalidRegion { start, end });
        }
        Ok(Self { range: start..end })
    }

    /// Build a region from bounds already known to be valid.
    pub(crate) const fn from_valid_bounds(start: u64, end: u64) -> Self {
        Self { range: start..end }
    }

    /// The first byte of the region.
    pub fn start(&self) -> u32 {
        // `new` guarantees start < end <= 2^32.
        self.range.start as u32
    }

    /// The exclusive end of the region.
    pub fn end(&self) -> u64 {
        self.range.end
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.range.end - self.range.start
    }

    /// The number of 32-bit words needed to cover the region.
    pub fn word_count(&self) -> u64 {
        self.size().div_ceil(4)
    }

    /// Addresses of the words covering the region, in ascending order.
    pub fn word_addresses(&self) -> impl Iterator<Item = u32> {
        let end = self.range.end;
        (self.range.start..end).step_by(4).map(|address| address as u32)
    }

    pub fn contains(&self, address: u64) -> bool {
        self.range.contains(&address)
    }
}

/// What a region read does with a word that cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadErrorPolicy {
    /// Stop and return the error.
    Abort,
    /// Store the given value in place of the word and continue.
    Substitute(u32),
}
