// bubble.rs - River bubbles
//
// Bubbles rise out of the river band and respawn below it once they clear
// the surface.

use super::rand_range;
use crate::world::{RiverBand, Viewport};

use std::f64::consts::TAU;

/// How far above the bubble line a bubble may rise before respawning.
const RESPAWN_ABOVE: f64 = 42.0;
/// Bubbles higher than this above the bubble line are not drawn.
pub const VISIBLE_ABOVE: f64 = 8.0;

pub struct RiverBubbles {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub r: Vec<f64>,
    pub rise: Vec<f64>,
    pub drift: Vec<f64>,
    pub wobble: Vec<f64>,
    pub wobble_rate: Vec<f64>,
    pub alpha: Vec<f64>,
}

impl RiverBubbles {
    pub fn empty() -> Self {
        Self::with_capacity(0)
    }

    fn with_capacity(n: usize) -> Self {
        Self {
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            r: Vec::with_capacity(n),
            rise: Vec::with_capacity(n),
            drift: Vec::with_capacity(n),
            wobble: Vec::with_capacity(n),
            wobble_rate: Vec::with_capacity(n),
            alpha: Vec::with_capacity(n),
        }
    }

    pub fn generate(count: usize, vp: &Viewport, band: &RiverBand, rng: &mut u32) -> Self {
        let mut b = Self::with_capacity(count);
        for _ in 0..count {
            b.x.push(rand_range(rng, 0.0, vp.width));
            b.y.push(rand_range(rng, band.top + 10.0, band.bottom + 80.0));
            b.r.push(rand_range(rng, 1.4, 4.2));
            b.rise.push(rand_range(rng, 0.12, 0.42));
            b.drift.push(rand_range(rng, -0.08, 0.08));
            b.wobble.push(rand_range(rng, 0.0, TAU));
            b.wobble_rate.push(rand_range(rng, 0.008, 0.02));
            b.alpha.push(rand_range(rng, 0.08, 0.22));
        }
        b
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Rise and sway; bubbles that cleared the surface come back from below
    /// with a new size and brightness.
    pub fn update(&mut self, vp: &Viewport, reduced_motion: bool, rng: &mut u32) {
        let line = RiverBand::bubble_top(vp);

        for i in 0..self.len() {
            if !reduced_motion {
                self.y[i] -= self.rise[i];
                self.wobble[i] += self.wobble_rate[i];
                self.x[i] += self.wobble[i].sin() * 0.12 + self.drift[i];
            }

            if self.y[i] < line - RESPAWN_ABOVE {
                self.y[i] = rand_range(rng, vp.height * 0.84, vp.height + 80.0);
                self.x[i] = rand_range(rng, 0.0, vp.width);
                self.r[i] = rand_range(rng, 1.4, 4.2);
                self.alpha[i] = rand_range(rng, 0.08, 0.22);
            }
        }
    }

    pub fn is_visible(&self, i: usize, vp: &Viewport) -> bool {
        self.y[i] > RiverBand::bubble_top(vp) - VISIBLE_ABOVE
    }
}
