use embedded_graphics::{pixelcolor::Rgb565, prelude::RgbColor};

// Linear rescale between channel depths, rounded to the nearest step.
fn rescale(value: u8, from_max: u16, to_max: u16) -> u8 {
    ((value as u16 * to_max + from_max / 2) / from_max) as u8
}

pub fn rgb888_to_rgb565(r: u8, g: u8, b: u8) -> Rgb565 {
    Rgb565::new(rescale(r, 255, 31), rescale(g, 255, 63), rescale(b, 255, 31))
}

pub fn rgb565_to_rgb888(color: Rgb565) -> (u8, u8, u8) {
    (
        rescale(color.r(), 31, 255),
        rescale(color.g(), 63, 255),
        rescale(color.b(), 31, 255),
    )
}

/// Parses `#rrggbb` (the `#` is optional).
pub fn parse_hex(hex: &str) -> Option<Rgb565> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(rgb888_to_rgb565(channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_survive() {
        assert_eq!(rgb888_to_rgb565(0, 0, 0), Rgb565::BLACK);
        assert_eq!(rgb888_to_rgb565(255, 255, 255), Rgb565::WHITE);
        assert_eq!(rgb565_to_rgb888(Rgb565::WHITE), (255, 255, 255));
    }

    #[test]
    fn parses_hex() {
        assert_eq!(parse_hex("#ff0000"), Some(Rgb565::RED));
        assert_eq!(parse_hex("00ff00"), Some(Rgb565::GREEN));
        assert_eq!(parse_hex("#12345"), None);
        assert_eq!(parse_hex("#gg0000"), None);
    }
}
