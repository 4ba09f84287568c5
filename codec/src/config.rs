//! Types for use as [crate::Read::Cfg].

use core::ops::{Bound, RangeBounds};

/// Inclusive/exclusive bounds accepted for a decoded quantity.
///
/// Collections, strings and byte blobs use `RangeCfg<usize>` to limit the compact length prefix
/// they are willing to accept before allocating.
///
/// # Examples
///
/// ```
/// use scale_codec::RangeCfg;
///
/// let cfg = RangeCfg::new(0..=1024);
/// assert!(cfg.contains(&500));
/// assert!(!cfg.contains(&2000));
///
/// let any: RangeCfg<usize> = RangeCfg::default();
/// assert!(any.contains(&usize::MAX));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RangeCfg<T: Copy + PartialOrd> {
    start: Bound<T>,
    end: Bound<T>,
}

macro_rules! impl_from_range {
    ($($range:ty),+) => {
        $(
            impl<T: Copy + PartialOrd> From<$range> for RangeCfg<T> {
                fn from(r: $range) -> Self {
                    Self::new(r)
                }
            }
        )+
    };
}

impl_from_range!(
    core::ops::Range<T>,
    core::ops::RangeInclusive<T>,
    core::ops::RangeFrom<T>,
    core::ops::RangeTo<T>,
    core::ops::RangeToInclusive<T>
);

impl<T: Copy + PartialOrd> From<core::ops::RangeFull> for RangeCfg<T> {
    fn from(_: core::ops::RangeFull) -> Self {
        Self::full()
    }
}

impl<T: Copy + PartialOrd> Default for RangeCfg<T> {
    fn default() -> Self {
        Self::full()
    }
}

impl<T: Copy + PartialOrd> RangeCfg<T> {
    /// Creates a new `RangeCfg` from any type implementing `RangeBounds<T>`.
    pub fn new(r: impl RangeBounds<T>) -> Self {
        RangeCfg {
            start: r.start_bound().cloned(),
            end: r.end_bound().cloned(),
        }
    }

    /// Accepts every value.
    pub fn full() -> Self {
        Self {
            start: Bound::Unbounded,
            end: Bound::Unbounded,
        }
    }

    /// Creates a `RangeCfg` that only accepts exactly `value`.
    pub fn exact(value: T) -> Self {
        Self {
            start: Bound::Included(value),
            end: Bound::Included(value),
        }
    }

    /// Returns true if the value is within this range.
    pub fn contains(&self, value: &T) -> bool {
        match &self.start {
            Bound::Included(s) if value < s => return false,
            Bound::Excluded(s) if value <= s => return false,
            _ => {}
        }
        match &self.end {
            Bound::Included(e) if value > e => return false,
            Bound::Excluded(e) if value >= e => return false,
            _ => {}
        }
        true
    }
}

impl<T: Copy + PartialOrd> RangeBounds<T> for RangeCfg<T> {
    fn start_bound(&self) -> Bound<&T> {
        self.start.as_ref()
    }

    fn end_bound(&self) -> Bound<&T> {
        self.end.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::ops::Bound::{Excluded, Included, Unbounded};
    use test_case::test_case;

    #[test]
    fn test_range_cfg_from() {
        let full: RangeCfg<usize> = (..).into();
        assert_eq!(full, RangeCfg::default());
        assert_eq!(full.start_bound(), Unbounded);

        let half: RangeCfg<usize> = (5..).into();
        assert_eq!(half.start_bound(), Included(&5));
        assert_eq!(half.end_bound(), Unbounded);

        let below: RangeCfg<usize> = (..10).into();
        assert_eq!(below.end_bound(), Excluded(&10));

        let closed: RangeCfg<usize> = (5..=10).into();
        assert_eq!(closed.start_bound(), Included(&5));
        assert_eq!(closed.end_bound(), Included(&10));
    }

    #[test_case(RangeCfg::full(), 0, true; "full accepts zero")]
    #[test_case(RangeCfg::full(), usize::MAX, true; "full accepts max")]
    #[test_case(RangeCfg::new(5..), 4, false; "below inclusive start")]
    #[test_case(RangeCfg::new(5..), 5, true; "at inclusive start")]
    #[test_case(RangeCfg::new(..10), 10, false; "at exclusive end")]
    #[test_case(RangeCfg::new(..=10), 10, true; "at inclusive end")]
    #[test_case(RangeCfg::new(5..5), 5, false; "empty range")]
    #[test_case(RangeCfg::exact(3), 3, true; "exact match")]
    #[test_case(RangeCfg::exact(3), 4, false; "exact mismatch")]
    fn test_range_cfg_contains(cfg: RangeCfg<usize>, value: usize, expected: bool) {
        assert_eq!(cfg.contains(&value), expected);
    }

    #[test]
    fn test_exclusive_start() {
        let cfg = RangeCfg {
            start: Excluded(5u32),
            end: Excluded(10u32),
        };
        assert!(!cfg.contains(&5));
        assert!(cfg.contains(&6));
        assert!(cfg.contains(&9));
        assert!(!cfg.contains(&10));
    }
}
