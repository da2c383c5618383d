//! Miscellaneous utility structs and functions.

use std::fmt::Debug;
use std::ops::Range;

/// A half-open interval `[min, max)` on the integer number line.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval<T> {
    pub min: T,
    pub max: T,
}

impl<T> Interval<T> {
    /// Creates a new interval.
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: PartialOrd> Interval<T> {
    /// Returns true if this interval overlaps with the other.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.max > other.min && other.max > self.min
    }

    /// Returns true if this interval contains the value.
    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value < self.max
    }
}

impl<T: std::ops::Sub<T, Output = T> + Copy> Interval<T> {
    /// Gets the magnitude of the interval.
    pub fn length(&self) -> T {
        self.max - self.min
    }
}

impl<T: Copy + Ord> Interval<T> {
    /// Restricts the interval to lie within `bounds`.
    /// The result is empty (`min == max`) if the two do not overlap.
    pub fn clamp_to(&self, bounds: Self) -> Self {
        let min = self.min.clamp(bounds.min, bounds.max);
        let max = self.max.clamp(min, bounds.max);
        Self { min, max }
    }
}

impl Interval<i32> {
    /// Converts the interval into an index range, clipping it to `0..len`.
    pub fn to_index_range(&self, len: usize) -> Range<usize> {
        let len = i32::try_from(len).unwrap_or(i32::MAX);
        let clipped = self.clamp_to(Interval::new(0, len));
        clipped.min as usize..clipped.max as usize
    }
}

impl<T: Debug> Debug for Interval<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interval({:?}, {:?})", &self.min, &self.max)
    }
}
