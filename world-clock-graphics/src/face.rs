//! Drawing the clock face with embedded-graphics primitives.

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::Rgb565,
    prelude::{DrawTarget, Point, Primitive, Size},
    primitives::{Circle, Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, StrokeAlignment},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
    Drawable,
};

use crate::geometry::{dial_mark, numeral_position, Position};
use crate::model::{HandEndpoints, HandKind};
use crate::style::ClockStyle;
use crate::wall_time::WallTime;

const NUMERALS: [&str; 12] = [
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceLayout {
    pub center: Position,
    pub radius: f32,
}

impl FaceLayout {
    /// The largest circle centered in `bounds` that keeps `margin` free.
    pub fn fit(bounds: Rectangle, margin: u32) -> Self {
        let side = bounds.size.width.min(bounds.size.height);
        let diameter = side.saturating_sub(margin * 2);
        Self {
            center: bounds.center().into(),
            radius: diameter as f32 / 2.0,
        }
    }

    pub fn diameter(&self) -> u32 {
        (self.radius * 2.0).round() as u32
    }
}

fn centered_text() -> embedded_graphics::text::TextStyle {
    TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build()
}

/// Dial fill, rim, minute and hour marks, numerals and the zone label.
/// Filling the dial also erases whatever hands were drawn before.
pub fn draw_dial<D>(
    target: &mut D,
    layout: &FaceLayout,
    style: &ClockStyle,
    label: Option<&str>,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let center = layout.center;
    Circle::with_center(center.to_point(), layout.diameter())
        .into_styled(
            PrimitiveStyleBuilder::new()
                .fill_color(style.face)
                .stroke_color(style.rim)
                .stroke_width(style.rim_width)
                .stroke_alignment(StrokeAlignment::Inside)
                .build(),
        )
        .draw(target)?;

    let outer = layout.radius - style.rim_width as f32 - 2.0;
    for index in 0..60u8 {
        let (inner, width) = if index % 5 == 0 {
            (layout.radius * 0.84, 3)
        } else {
            (layout.radius * 0.9, 1)
        };
        let (from, to) = dial_mark(index, center, inner, outer);
        Line::new(from.to_point(), to.to_point())
            .into_styled(PrimitiveStyle::with_stroke(style.marks, width))
            .draw(target)?;
    }

    let mut numeral_style = MonoTextStyle::new(style.numeral_font, style.numerals);
    numeral_style.background_color = Some(style.face);
    let distance = layout.radius * style.numeral_distance;
    for (i, numeral) in NUMERALS.into_iter().enumerate() {
        let position = numeral_position(i as u8 + 1, center, distance);
        Text::with_text_style(numeral, position.to_point(), numeral_style, centered_text())
            .draw(target)?;
    }

    if let Some(label) = label {
        let label_style = MonoTextStyle::new(style.label_font, style.label);
        let at = Point::new(
            center.x.round() as i32,
            (center.y + layout.radius * 0.38).round() as i32,
        );
        Text::with_text_style(label, at, label_style, centered_text()).draw(target)?;
    }

    Ok(())
}

pub fn draw_hands<D>(
    target: &mut D,
    layout: &FaceLayout,
    style: &ClockStyle,
    time: WallTime,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let mut hands = style.hands();
    hands.set_time(time);
    let tips = HandEndpoints::compute(&hands, &hands.angles(), layout.center, layout.radius);
    let center = layout.center.to_point();

    for (kind, tip) in [
        (HandKind::Hour, tips.hour),
        (HandKind::Minute, tips.minute),
        (HandKind::Second, tips.second),
    ] {
        let hand_style = style.hand_style(kind);
        Line::new(center, tip.to_point())
            .into_styled(PrimitiveStyle::with_stroke(hand_style.color, hand_style.thickness))
            .draw(target)?;
    }

    let cap = style.second_hand.thickness * 3 + 4;
    Circle::with_center(center, cap)
        .into_styled(PrimitiveStyle::with_fill(style.second_hand.color))
        .draw(target)?;

    Ok(())
}

pub const DEFAULT_SIZE: Size = Size::new(240, 240);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_fits_smaller_side() {
        let layout = FaceLayout::fit(Rectangle::new(Point::zero(), Size::new(240, 200)), 4);
        assert_eq!(layout.radius, 96.0);
        assert_eq!(layout.diameter(), 192);
        assert_eq!(layout.center.to_point(), Point::new(119, 99));
    }

    #[test]
    fn layout_survives_tiny_target() {
        let layout = FaceLayout::fit(Rectangle::new(Point::zero(), Size::new(4, 4)), 4);
        assert_eq!(layout.radius, 0.0);
    }
}
