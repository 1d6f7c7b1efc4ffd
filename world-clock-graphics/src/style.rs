use embedded_graphics::{mono_font::MonoFont, pixelcolor::Rgb565, prelude::RgbColor};
use profont::{PROFONT_12_POINT, PROFONT_18_POINT};

use crate::color::{parse_hex, rgb888_to_rgb565};
use crate::model::{Hand, HandKind, Hands};

#[derive(Clone, Copy, PartialEq)]
pub struct HandStyle {
    pub ratio: f32,
    pub thickness: u32,
    pub color: Rgb565,
}

impl HandStyle {
    pub fn from_hand(hand: Hand, color: Rgb565) -> Self {
        Self {
            ratio: hand.ratio,
            thickness: hand.thickness,
            color,
        }
    }

    pub fn hand(&self, kind: HandKind) -> Hand {
        Hand::new(kind, self.ratio, self.thickness)
    }
}

#[derive(Clone, Copy)]
pub struct ClockStyle {
    pub background: Rgb565,
    pub face: Rgb565,
    pub rim: Rgb565,
    pub rim_width: u32,
    pub marks: Rgb565,
    pub numerals: Rgb565,
    pub label: Rgb565,
    /// Numeral distance from the center as a fraction of the radius.
    pub numeral_distance: f32,
    pub numeral_font: &'static MonoFont<'static>,
    pub label_font: &'static MonoFont<'static>,
    /// Pixels kept free between the rim and the edge of the target.
    pub margin: u32,
    pub hour_hand: HandStyle,
    pub minute_hand: HandStyle,
    pub second_hand: HandStyle,
}

impl Default for ClockStyle {
    fn default() -> Self {
        let accent = rgb888_to_rgb565(255, 182, 140);
        let ink = rgb888_to_rgb565(30, 30, 36);
        Self {
            background: Rgb565::BLACK,
            face: Rgb565::WHITE,
            rim: accent,
            rim_width: 6,
            marks: ink,
            numerals: ink,
            label: rgb888_to_rgb565(120, 120, 128),
            numeral_distance: 0.72,
            numeral_font: &PROFONT_18_POINT,
            label_font: &PROFONT_12_POINT,
            margin: 4,
            hour_hand: HandStyle::from_hand(Hand::hour(), ink),
            minute_hand: HandStyle::from_hand(Hand::minute(), ink),
            second_hand: HandStyle::from_hand(Hand::second(), rgb888_to_rgb565(220, 40, 40)),
        }
    }
}

impl ClockStyle {
    pub fn hands(&self) -> Hands {
        Hands {
            hour: self.hour_hand.hand(HandKind::Hour),
            minute: self.minute_hand.hand(HandKind::Minute),
            second: self.second_hand.hand(HandKind::Second),
        }
    }

    pub fn hand_style(&self, kind: HandKind) -> &HandStyle {
        match kind {
            HandKind::Hour => &self.hour_hand,
            HandKind::Minute => &self.minute_hand,
            HandKind::Second => &self.second_hand,
        }
    }

    pub fn with_hand(mut self, kind: HandKind, style: HandStyle) -> Self {
        match kind {
            HandKind::Hour => self.hour_hand = style,
            HandKind::Minute => self.minute_hand = style,
            HandKind::Second => self.second_hand = style,
        }
        self
    }

    /// Applies a `name=#rrggbb` override. Returns false for unknown names or
    /// malformed colors.
    pub fn apply_color(&mut self, name: &str, hex: &str) -> bool {
        let Some(color) = parse_hex(hex) else {
            return false;
        };
        let slot = match name {
            "background" => &mut self.background,
            "face" => &mut self.face,
            "rim" => &mut self.rim,
            "marks" => &mut self.marks,
            "numerals" => &mut self.numerals,
            "label" => &mut self.label,
            "hour" => &mut self.hour_hand.color,
            "minute" => &mut self.minute_hand.color,
            "second" => &mut self.second_hand.color,
            _ => return false,
        };
        *slot = color;
        true
    }
}
