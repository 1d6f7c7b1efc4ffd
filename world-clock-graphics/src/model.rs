//! The clock face model: timezone, hands and the geometry derived from them.

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;

use crate::error::{ClockError, ClockResult};
use crate::geometry::{
    hand_endpoint, hour_angle, minute_angle, numeral_position, second_angle, Position,
};
use crate::wall_time::{HandAngles, WallTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandKind {
    Hour,
    Minute,
    Second,
}

/// One clock hand.
///
/// `ratio` divides the dial radius, so a larger ratio gives a shorter hand.
/// `value` is the hour folded onto 0..12 for the hour hand, 0..60 otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hand {
    pub kind: HandKind,
    pub ratio: f32,
    pub thickness: u32,
    pub value: u8,
}

impl Hand {
    pub const fn new(kind: HandKind, ratio: f32, thickness: u32) -> Self {
        Self {
            kind,
            ratio,
            thickness,
            value: 0,
        }
    }

    pub const fn hour() -> Self {
        Self::new(HandKind::Hour, 2.0, 6)
    }

    pub const fn minute() -> Self {
        Self::new(HandKind::Minute, 1.35, 4)
    }

    pub const fn second() -> Self {
        Self::new(HandKind::Second, 1.15, 2)
    }

    pub fn length(&self, radius: f32) -> f32 {
        radius / self.ratio
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hands {
    pub hour: Hand,
    pub minute: Hand,
    pub second: Hand,
}

impl Default for Hands {
    fn default() -> Self {
        Self {
            hour: Hand::hour(),
            minute: Hand::minute(),
            second: Hand::second(),
        }
    }
}

impl Hands {
    pub fn set_time(&mut self, time: WallTime) {
        self.hour.value = time.hour12();
        self.minute.value = time.minute;
        self.second.value = time.second;
    }

    pub fn angles(&self) -> HandAngles {
        HandAngles {
            hour: hour_angle(self.hour.value, self.minute.value),
            minute: minute_angle(self.minute.value),
            second: second_angle(self.second.value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandEndpoints {
    pub hour: Position,
    pub minute: Position,
    pub second: Position,
}

impl HandEndpoints {
    pub fn compute(hands: &Hands, angles: &HandAngles, center: Position, radius: f32) -> Self {
        Self {
            hour: hand_endpoint(angles.hour, center, hands.hour.length(radius)),
            minute: hand_endpoint(angles.minute, center, hands.minute.length(radius)),
            second: hand_endpoint(angles.second, center, hands.second.length(radius)),
        }
    }
}

pub fn parse_timezone(name: &str) -> ClockResult<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ClockError::InvalidTimezone(name.to_string()))
}

#[derive(Debug, Clone, Default)]
pub struct ClockFaceModel {
    timezone: Option<Tz>,
    time: Option<WallTime>,
    hands: Hands,
}

impl ClockFaceModel {
    pub fn unconfigured() -> Self {
        Self::default()
    }

    pub fn new(timezone: &str) -> ClockResult<Self> {
        let mut model = Self::default();
        model.set_timezone(timezone)?;
        Ok(model)
    }

    pub fn with_timezone(timezone: Tz) -> Self {
        Self {
            timezone: Some(timezone),
            ..Self::default()
        }
    }

    pub fn with_hands(mut self, hands: Hands) -> Self {
        self.hands = hands;
        if let Some(time) = self.time {
            self.hands.set_time(time);
        }
        self
    }

    /// Takes effect on the next `tick`. On error the previous zone is kept.
    pub fn set_timezone(&mut self, timezone: &str) -> ClockResult<Tz> {
        let tz = parse_timezone(timezone)?;
        self.timezone = Some(tz);
        Ok(tz)
    }

    pub fn timezone(&self) -> Option<Tz> {
        self.timezone
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> ClockResult<WallTime> {
        let tz = self.timezone.ok_or(ClockError::NoTimezoneConfigured)?;
        let local = now.with_timezone(&tz);
        let time = WallTime {
            hour: local.hour() as u8,
            minute: local.minute() as u8,
            // leap seconds show up as nanoseconds >= 1e9, second() stays below 60
            second: local.second() as u8,
        };
        self.time = Some(time);
        self.hands.set_time(time);
        Ok(time)
    }

    /// The last sampled time, `None` before the first successful tick.
    pub fn time(&self) -> Option<WallTime> {
        self.time
    }

    pub fn hands(&self) -> &Hands {
        &self.hands
    }

    /// Before the first tick all hands rest at 12.
    pub fn hand_angles(&self) -> HandAngles {
        self.hands.angles()
    }

    pub fn hand_endpoint(&self, angle: f32, center: Position, length: f32) -> Position {
        hand_endpoint(angle, center, length)
    }

    pub fn hand_endpoints(&self, center: Position, radius: f32) -> HandEndpoints {
        HandEndpoints::compute(&self.hands, &self.hand_angles(), center, radius)
    }

    pub fn numeral_position(&self, numeral: u8, center: Position, distance: f32) -> Position {
        numeral_position(numeral, center, distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, s).unwrap()
    }

    fn triple(t: WallTime) -> (u8, u8, u8) {
        (t.hour, t.minute, t.second)
    }

    #[test]
    fn utc_midnight() {
        let mut model = ClockFaceModel::new("UTC").unwrap();
        let time = model.tick(at(0, 0, 0)).unwrap();
        assert_eq!(triple(time), (0, 0, 0));
    }

    #[test]
    fn utc_afternoon() {
        let mut model = ClockFaceModel::new("UTC").unwrap();
        let time = model.tick(at(12, 30, 45)).unwrap();
        assert_eq!(triple(time), (12, 30, 45));
        assert_eq!(model.hands().hour.value, 0);
        assert_eq!(model.hands().minute.value, 30);
        assert_eq!(model.hands().second.value, 45);
    }

    #[test]
    fn new_york_in_winter() {
        let mut model = ClockFaceModel::new("America/New_York").unwrap();
        let time = model.tick(at(12, 30, 45)).unwrap();
        assert_eq!(triple(time), (7, 30, 45));
    }

    #[test]
    fn ticking_is_deterministic() {
        let mut model = ClockFaceModel::new("Asia/Kolkata").unwrap();
        let first = model.tick(at(3, 14, 15)).unwrap();
        let second = model.tick(at(3, 14, 15)).unwrap();
        assert_eq!(first, second);
        // +05:30
        assert_eq!(triple(first), (8, 44, 15));
    }

    #[test]
    fn invalid_timezone_keeps_previous() {
        let mut model = ClockFaceModel::new("UTC").unwrap();
        assert_eq!(
            model.set_timezone("Not/AZone"),
            Err(ClockError::InvalidTimezone("Not/AZone".to_string()))
        );
        assert_eq!(model.timezone(), Some(Tz::UTC));
        assert!(matches!(
            ClockFaceModel::new("Not/AZone"),
            Err(ClockError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn tick_without_timezone_fails() {
        let mut model = ClockFaceModel::unconfigured();
        assert_eq!(model.tick(at(1, 2, 3)), Err(ClockError::NoTimezoneConfigured));
        assert_eq!(model.time(), None);
    }

    #[test]
    fn timezone_change_applies_on_next_tick() {
        let mut model = ClockFaceModel::new("UTC").unwrap();
        model.tick(at(12, 0, 0)).unwrap();
        model.set_timezone("Europe/Stockholm").unwrap();
        assert_eq!(model.time().map(|t| t.hour), Some(12));
        let time = model.tick(at(12, 0, 0)).unwrap();
        assert_eq!(time.hour, 13);
    }

    #[test]
    fn hand_lengths_follow_ratio() {
        let mut model = ClockFaceModel::new("UTC").unwrap();
        model.tick(at(3, 0, 30)).unwrap();
        let center = Position::new(100.0, 100.0);
        let tips = model.hand_endpoints(center, 100.0);
        // 03:00 puts the hour hand flat to the right at radius / 2
        assert!((tips.hour.x - 150.0).abs() < 1e-3);
        assert!((tips.hour.y - 100.0).abs() < 1e-3);
        // 30 s points straight down
        assert!((tips.second.x - 100.0).abs() < 1e-3);
        assert!((tips.second.y - (100.0 + 100.0 / 1.15)).abs() < 1e-3);
        assert!(center.distance_to(tips.hour) < center.distance_to(tips.minute));
        assert!(center.distance_to(tips.minute) < center.distance_to(tips.second));
    }

    #[test]
    fn angles_follow_hand_values() {
        let mut model = ClockFaceModel::new("Asia/Tokyo").unwrap();
        assert_eq!(model.hand_angles(), Hands::default().angles());
        let time = model.tick(at(8, 45, 10)).unwrap();
        // 17:45 local shows as 5:45 on the dial
        assert_eq!(model.hands().hour.value, 5);
        assert_eq!(model.hand_angles(), time.hand_angles());
    }

    #[test]
    fn custom_hands_keep_current_time() {
        let mut model = ClockFaceModel::new("UTC").unwrap();
        model.tick(at(9, 15, 0)).unwrap();
        let hands = Hands {
            hour: Hand::new(HandKind::Hour, 4.0, 8),
            ..Hands::default()
        };
        let model = model.with_hands(hands);
        assert_eq!(model.hands().hour.value, 9);
        assert_eq!(model.hands().minute.value, 15);
        // just past 9 o'clock at radius / 4
        let tips = model.hand_endpoints(Position::new(0.0, 0.0), 100.0);
        assert!(tips.hour.x < -24.0 && tips.hour.x > -25.1);
    }
}
