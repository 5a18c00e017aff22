// viewport.rs - Logical viewport and backing resolution

use super::is_desktop_width;

/// Density ratios above this are capped to bound fill cost on dense displays.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// CSS-pixel viewport plus the (capped) device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width: sanitize_len(width),
            height: sanitize_len(height),
            dpr: cap_pixel_ratio(device_pixel_ratio),
        }
    }

    /// Zero-sized viewports happen during initial layout; frames skip painting.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Backing store size in device pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        (
            (self.width * self.dpr).floor() as u32,
            (self.height * self.dpr).floor() as u32,
        )
    }

    pub fn is_desktop(&self) -> bool {
        is_desktop_width(self.width)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

/// Missing, zero or bogus ratios count as 1.
pub fn cap_pixel_ratio(raw: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    raw.min(MAX_PIXEL_RATIO)
}

fn sanitize_len(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}
