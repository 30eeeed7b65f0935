//! RTMP timestamps are 32 bit unsigned millisecond counts from an unspecified epoch.
//!
//! A live stream can outlast the 32 bit range, so arithmetic wraps around and two
//! timestamps are ordered by which one is "ahead" of the other within half the range
//! (2<sup>31</sup> - 1 milliseconds), the same way serial numbers are compared.
//!
//! ```
//! use pushcast_rtmp::time::RtmpTimestamp;
//!
//! let start = RtmpTimestamp::new(u32::MAX - 5);
//! let later = start + 10;
//!
//! assert_eq!(later, RtmpTimestamp::new(4));
//! assert!(later > start);
//! assert_eq!((later - start).value, 10);
//! ```

use std::cmp::Ordering;
use std::ops::{Add, Sub};

const HALF_RANGE: u32 = 1 << 31;

/// A wrapping millisecond timestamp as carried in chunk headers
#[derive(Eq, PartialEq, Debug, Copy, Clone, Default, Hash)]
pub struct RtmpTimestamp {
    pub value: u32,
}

impl RtmpTimestamp {
    pub fn new(value: u32) -> Self {
        RtmpTimestamp { value }
    }

    pub fn set(&mut self, value: u32) {
        self.value = value;
    }
}

impl From<u32> for RtmpTimestamp {
    fn from(value: u32) -> Self {
        RtmpTimestamp::new(value)
    }
}

impl Add for RtmpTimestamp {
    type Output = RtmpTimestamp;

    fn add(self, other: RtmpTimestamp) -> Self {
        self + other.value
    }
}

impl Add<u32> for RtmpTimestamp {
    type Output = RtmpTimestamp;

    fn add(self, other: u32) -> Self {
        RtmpTimestamp::new(self.value.wrapping_add(other))
    }
}

impl Sub for RtmpTimestamp {
    type Output = RtmpTimestamp;

    fn sub(self, other: RtmpTimestamp) -> Self {
        self - other.value
    }
}

impl Sub<u32> for RtmpTimestamp {
    type Output = RtmpTimestamp;

    fn sub(self, other: u32) -> Self {
        RtmpTimestamp::new(self.value.wrapping_sub(other))
    }
}

impl Ord for RtmpTimestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        let distance = other.value.wrapping_sub(self.value);
        if distance == 0 {
            Ordering::Equal
        } else if distance < HALF_RANGE {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }
}

impl PartialOrd for RtmpTimestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq<u32> for RtmpTimestamp {
    fn eq(&self, other: &u32) -> bool {
        self.value == *other
    }
}

#[cfg(test)]
mod tests {
    use super::RtmpTimestamp;

    #[test]
    fn addition_wraps_around() {
        let time = RtmpTimestamp::new(u32::MAX) + 2;
        assert_eq!(time, RtmpTimestamp::new(1));
    }

    #[test]
    fn subtraction_wraps_around() {
        let time = RtmpTimestamp::new(1) - RtmpTimestamp::new(3);
        assert_eq!(time, RtmpTimestamp::new(u32::MAX - 1));
    }

    #[test]
    fn timestamps_within_half_range_compare_by_distance() {
        let time1 = RtmpTimestamp::new(10000);
        let time2 = RtmpTimestamp::new(4000000000);
        let time3 = RtmpTimestamp::new(3000000000);

        assert!(time1 > time2, "Wrapped timestamp should be ahead");
        assert!(time3 < time2);
        assert!(RtmpTimestamp::new(5) < RtmpTimestamp::new(6));
    }

    #[test]
    fn can_compare_to_raw_value() {
        assert!(RtmpTimestamp::new(50) == 50);
    }
}
