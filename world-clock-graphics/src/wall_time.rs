use std::fmt;

use crate::geometry::{hour_angle, minute_angle, second_angle};

/// Local calendar time of day sampled from a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WallTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// Angles of the three hands, radians, 0 at 12 o'clock, clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandAngles {
    pub hour: f32,
    pub minute: f32,
    pub second: f32,
}

const VALID_BIT: u32 = 1 << 31;

impl WallTime {
    /// Returns `None` unless `hour < 24`, `minute < 60` and `second < 60`.
    pub fn new(hour: u8, minute: u8, second: u8) -> Option<Self> {
        (hour < 24 && minute < 60 && second < 60).then_some(Self {
            hour,
            minute,
            second,
        })
    }

    pub fn hour12(&self) -> u8 {
        self.hour % 12
    }

    pub fn hand_angles(&self) -> HandAngles {
        HandAngles {
            hour: hour_angle(self.hour, self.minute),
            minute: minute_angle(self.minute),
            second: second_angle(self.second),
        }
    }

    /// Packs the triple into one word so it can be published with a single
    /// atomic store. Zero is reserved for "nothing published".
    pub fn pack(&self) -> u32 {
        VALID_BIT | (self.hour as u32) << 16 | (self.minute as u32) << 8 | self.second as u32
    }

    pub fn unpack(word: u32) -> Option<Self> {
        if word & VALID_BIT == 0 {
            return None;
        }
        Self::new(
            (word >> 16 & 0xff) as u8,
            (word >> 8 & 0xff) as u8,
            (word & 0xff) as u8,
        )
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range() {
        assert!(WallTime::new(24, 0, 0).is_none());
        assert!(WallTime::new(0, 60, 0).is_none());
        assert!(WallTime::new(0, 0, 60).is_none());
        assert!(WallTime::new(23, 59, 59).is_some());
    }

    #[test]
    fn midnight_packs_to_nonzero() {
        let midnight = WallTime::new(0, 0, 0).unwrap();
        assert_ne!(midnight.pack(), 0);
        assert_eq!(WallTime::unpack(midnight.pack()), Some(midnight));
        assert_eq!(WallTime::unpack(0), None);
    }

    #[test]
    fn displays_padded() {
        let t = WallTime::new(7, 5, 9).unwrap();
        assert_eq!(t.to_string(), "07:05:09");
        assert_eq!(WallTime::new(19, 0, 0).unwrap().hour12(), 7);
    }
}
