// color.rs - Page colour parsing and flattening
//
// The backdrop paints white at low alpha onto a clear canvas; the browser
// composites it over the page colour. Do the same here before saving.

use anyhow::{Result, bail};
use image::{Rgb, RgbImage, RgbaImage};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// `#rrggbb` or `rrggbb`.
    pub fn parse_hex(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            bail!("expected a #rrggbb colour, got {s:?}");
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

/// Composite a straight-alpha frame over an opaque colour.
pub fn flatten(frame: &RgbaImage, bg: Color) -> RgbImage {
    RgbImage::from_fn(frame.width(), frame.height(), |x, y| {
        let p = frame.get_pixel(x, y);
        let a = p[3] as f32 / 255.0;
        let over = |s: u8, d: u8| (s as f32 * a + d as f32 * (1.0 - a)).round() as u8;
        Rgb([over(p[0], bg.r), over(p[1], bg.g), over(p[2], bg.b)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        let c = Color::parse_hex("#0b1f33").unwrap();
        assert_eq!(c, Color { r: 0x0b, g: 0x1f, b: 0x33 });
        assert_eq!(Color::parse_hex("0B1F33").unwrap(), c);
        assert!(Color::parse_hex("#12345").is_err());
        assert!(Color::parse_hex("#zzzzzz").is_err());
    }

    #[test]
    fn transparent_pixels_show_background() {
        let frame = RgbaImage::from_pixel(2, 1, image::Rgba([255, 255, 255, 0]));
        let flat = flatten(&frame, Color { r: 10, g: 20, b: 30 });
        assert_eq!(flat.get_pixel(1, 0), &Rgb([10, 20, 30]));
    }
}
