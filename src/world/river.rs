// river.rs - River band geometry
//
// The band spans from `top` to the bottom of the viewport. Its surface is a
// sum of two sines so neighbouring wave lines never move in lockstep.

use super::{Viewport, clamp_soft, river_top_ratio};

/// Bubbles are culled/respawned relative to a line slightly above the band.
const BUBBLE_TOP_LIFT: f64 = 0.02;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RiverBand {
    pub top: f64,
    pub bottom: f64,
}

impl RiverBand {
    pub fn for_viewport(vp: &Viewport) -> Self {
        Self {
            top: vp.height * river_top_ratio(vp.width),
            bottom: vp.height,
        }
    }

    pub fn depth(&self) -> f64 {
        self.bottom - self.top
    }

    /// Vertical range fish are allowed to occupy.
    pub fn fish_lane(&self) -> (f64, f64) {
        let min_y = self.top + 6.0;
        let max_y = (self.bottom - 26.0).min(self.top + self.depth() * 0.62);
        (min_y, max_y)
    }

    /// Range new fish spawn in on regeneration, the upper half of the band.
    pub fn fish_spawn_lane(&self) -> (f64, f64) {
        (self.top + self.depth() * 0.08, self.top + self.depth() * 0.55)
    }

    pub fn clamp_fish_y(&self, y: f64) -> f64 {
        let (lo, hi) = self.fish_lane();
        clamp_soft(y, lo, hi)
    }

    /// Reference line for river bubbles.
    pub fn bubble_top(vp: &Viewport) -> f64 {
        vp.height * (river_top_ratio(vp.width) - BUBBLE_TOP_LIFT)
    }
}

/// Water surface height at `x`.
#[inline]
pub fn surface_y(x: f64, base: f64, amp1: f64, amp2: f64, phase: f64) -> f64 {
    base + (x * 0.009 + phase).sin() * amp1 + (x * 0.0048 + phase * 0.65).cos() * amp2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_top_follows_breakpoints() {
        let band = RiverBand::for_viewport(&Viewport::new(1600.0, 1000.0, 1.0));
        assert!((band.top - 740.0).abs() < 1e-9);
        let band = RiverBand::for_viewport(&Viewport::new(800.0, 1000.0, 1.0));
        assert!((band.top - 820.0).abs() < 1e-9);
    }

    #[test]
    fn fish_lane_is_inside_band() {
        let band = RiverBand::for_viewport(&Viewport::new(1440.0, 900.0, 1.0));
        let (lo, hi) = band.fish_lane();
        assert!(lo > band.top);
        assert!(hi < band.bottom);
        assert!((hi - (band.top + band.depth() * 0.62)).abs() < 1e-9);
    }

    #[test]
    fn short_viewports_cap_lane_above_bottom_margin() {
        let band = RiverBand { top: 100.0, bottom: 140.0 };
        let (_, hi) = band.fish_lane();
        assert_eq!(hi, 114.0);
    }

    #[test]
    fn surface_stays_within_amplitudes() {
        for x in (-20..2000).step_by(8) {
            let y = surface_y(x as f64, 500.0, 7.0, 2.5, 1.3);
            assert!((y - 500.0).abs() <= 9.5 + 1e-9);
        }
    }
}
