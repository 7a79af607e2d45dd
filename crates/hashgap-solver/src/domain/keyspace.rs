//! Keyspace enumeration
//!
//! Keys are zero-padded decimal strings of a fixed width. A keyspace covers
//! the integers `0..total`, and can be cut into contiguous partitions for
//! parallel workers.

use crate::constants::{EASY_KEY_WIDTH, EASY_KEYSPACE, HARD_KEY_WIDTH, HARD_KEYSPACE};
use std::fmt::Write;
use std::ops::Range;

/// A bounded range of fixed-width numeric keys
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeySpace {
    total: u64,
    width: usize,
}

impl KeySpace {
    /// Create a keyspace of `total` keys rendered at `width` digits
    pub fn new(total: u64, width: usize) -> Self {
        Self { total, width }
    }

    /// Every key of the given width (`10^width` keys)
    ///
    /// Returns `None` when `10^width` does not fit in a u64.
    pub fn full(width: usize) -> Option<Self> {
        let total = 10u64.checked_pow(u32::try_from(width).ok()?)?;
        Some(Self { total, width })
    }

    /// 4-digit keys, 10,000 in total
    pub fn easy() -> Self {
        Self::new(EASY_KEYSPACE, EASY_KEY_WIDTH)
    }

    /// 9-digit keys, 1,000,000,000 in total
    pub fn hard() -> Self {
        Self::new(HARD_KEYSPACE, HARD_KEY_WIDTH)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Render key number `n` at this keyspace's width
    pub fn format_key(&self, n: u64) -> String {
        let mut buf = String::with_capacity(self.width);
        self.write_key(n, &mut buf);
        buf
    }

    /// Render key number `n` into a reusable buffer (cleared first)
    #[inline]
    pub fn write_key(&self, n: u64, buf: &mut String) {
        buf.clear();
        // Writing into a String cannot fail
        let _ = write!(buf, "{:0width$}", n, width = self.width);
    }

    /// Iterate over every key in order
    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        self.keys_in(0..self.total)
    }

    /// Iterate over the keys of one partition
    pub fn keys_in(&self, range: Range<u64>) -> impl Iterator<Item = String> + '_ {
        range.map(move |n| self.format_key(n))
    }

    /// Split the keyspace into `parts` contiguous ranges
    ///
    /// See [`partition_range`].
    pub fn partition(&self, parts: usize) -> Vec<Range<u64>> {
        partition_range(self.total, parts)
    }
}

/// Split `0..total` into `parts` contiguous, non-overlapping ranges
///
/// Every range holds `total / parts` keys except the last, which also takes
/// the remainder. The ranges cover `0..total` exactly once. `parts == 0` is
/// treated as a single partition.
pub fn partition_range(total: u64, parts: usize) -> Vec<Range<u64>> {
    let parts = parts.max(1) as u64;
    let chunk = total / parts;

    (0..parts)
        .map(|i| {
            let start = i * chunk;
            let end = if i == parts - 1 { total } else { start + chunk };
            start..end
        })
        .collect()
}
