//! Angle and point math for an analog dial.
//!
//! Angles are radians measured clockwise from the positive x axis in a
//! y-down coordinate system, so `-π/2` points at 12 o'clock. Nothing in here
//! can fail for finite inputs.

use core::f32::consts::{FRAC_PI_2, PI, TAU};

use embedded_graphics::prelude::Point;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn to_point(self) -> Point {
        Point::new(self.x.round() as i32, self.y.round() as i32)
    }

    pub fn distance_to(self, other: Position) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<Point> for Position {
    fn from(point: Point) -> Self {
        Self::new(point.x as f32, point.y as f32)
    }
}

fn sixtieths_angle(value: f32) -> f32 {
    value / 60.0 * TAU - FRAC_PI_2
}

pub fn second_angle(second: u8) -> f32 {
    sixtieths_angle(second as f32)
}

pub fn minute_angle(minute: u8) -> f32 {
    sixtieths_angle(minute as f32)
}

/// Angle of the hour hand. `hour` may be given on a 24h dial, it is folded
/// onto 12 hours. The minute moves the hand between hour marks.
pub fn hour_angle(hour: u8, minute: u8) -> f32 {
    let hour12 = (hour % 12) as f32;
    (hour12 + minute as f32 / 60.0) / 12.0 * TAU - FRAC_PI_2
}

pub fn hand_endpoint(angle: f32, center: Position, length: f32) -> Position {
    Position::new(
        center.x + length * angle.cos(),
        center.y + length * angle.sin(),
    )
}

/// Anchor for numeral `numeral` (`1..=12`) at `distance` from `center`.
///
/// 12 sits straight above the center and the numerals run clockwise. The
/// y term is subtracted because screen y grows downward; flipping it would
/// mirror the dial vertically.
pub fn numeral_position(numeral: u8, center: Position, distance: f32) -> Position {
    let theta = ((numeral as f32 + 3.0) * 30.0).to_radians();
    Position::new(
        center.x + distance * (theta + PI).cos(),
        center.y - distance * theta.sin(),
    )
}

/// Inner and outer end of dial mark `index` (`0..60`, 0 at the top).
pub fn dial_mark(index: u8, center: Position, inner: f32, outer: f32) -> (Position, Position) {
    let angle = sixtieths_angle(index as f32);
    (
        hand_endpoint(angle, center, inner),
        hand_endpoint(angle, center, outer),
    )
}

/// Folds an angle into `[0, 2π)` so angles can be compared across the
/// 12 o'clock seam.
pub fn normalize_angle(angle: f32) -> f32 {
    angle.rem_euclid(TAU)
}
