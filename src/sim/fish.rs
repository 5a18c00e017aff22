// fish.rs - Fish crossing the river band
//
// Each fish enters from one side, swims to the other and re-enters on the
// side it came from once it is well past the far edge.

use super::{rand, rand_range};
use crate::world::{RiverBand, Viewport, fish_alpha_range, fish_scale_range};

use std::f64::consts::TAU;

/// Distance past an edge before a fish counts as gone.
pub const EXIT_MARGIN: f64 = 130.0;
/// Re-entry range, measured outward from the entry edge.
const REENTRY_NEAR: f64 = 40.0;
const REENTRY_FAR: f64 = 150.0;

pub struct FishSchool {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub scale: Vec<f64>,
    // Signed: positive swims left-to-right
    pub speed: Vec<f64>,
    pub sway: Vec<f64>,
    pub sway_rate: Vec<f64>,
    pub alpha: Vec<f64>,
    // +1 facing right, -1 mirrored
    pub facing: Vec<f64>,
}

impl FishSchool {
    pub fn empty() -> Self {
        Self::with_capacity(0)
    }

    fn with_capacity(n: usize) -> Self {
        Self {
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            scale: Vec::with_capacity(n),
            speed: Vec::with_capacity(n),
            sway: Vec::with_capacity(n),
            sway_rate: Vec::with_capacity(n),
            alpha: Vec::with_capacity(n),
            facing: Vec::with_capacity(n),
        }
    }

    pub fn generate(count: usize, vp: &Viewport, band: &RiverBand, rng: &mut u32) -> Self {
        let (scale_lo, scale_hi) = fish_scale_range(vp.width);
        let (alpha_lo, alpha_hi) = fish_alpha_range(vp.width);
        let (lane_lo, lane_hi) = band.fish_spawn_lane();

        let mut f = Self::with_capacity(count);
        for _ in 0..count {
            let from_left = rand(rng) > 0.5;
            let dir = if from_left { 1.0 } else { -1.0 };

            f.x.push(if from_left {
                rand_range(rng, -120.0, -20.0)
            } else {
                rand_range(rng, vp.width + 20.0, vp.width + 120.0)
            });
            // Shallow bands put the spawn lane above the swim lane
            f.y.push(band.clamp_fish_y(rand_range(rng, lane_lo, lane_hi)));
            f.scale.push(rand_range(rng, scale_lo, scale_hi));
            f.speed.push(rand_range(rng, 0.38, 0.6) * dir);
            f.sway.push(rand_range(rng, 0.0, TAU));
            f.sway_rate.push(rand_range(rng, 0.006, 0.014));
            f.alpha.push(rand_range(rng, alpha_lo, alpha_hi));
            f.facing.push(dir);
        }
        f
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Swim, re-enter after leaving, and keep every fish inside the lane.
    pub fn update(&mut self, vp: &Viewport, band: &RiverBand, reduced_motion: bool, rng: &mut u32) {
        let (min_y, max_y) = band.fish_lane();

        for i in 0..self.len() {
            if !reduced_motion {
                self.x[i] += self.speed[i];
                self.sway[i] += self.sway_rate[i];
            }

            if self.speed[i] > 0.0 && self.x[i] > vp.width + EXIT_MARGIN {
                self.x[i] = rand_range(rng, -REENTRY_FAR, -REENTRY_NEAR);
                self.y[i] = rand_range(rng, min_y, max_y);
            } else if self.speed[i] < 0.0 && self.x[i] < -EXIT_MARGIN {
                self.x[i] = rand_range(rng, vp.width + REENTRY_NEAR, vp.width + REENTRY_FAR);
                self.y[i] = rand_range(rng, min_y, max_y);
            }

            // Lane may have moved since this fish spawned
            self.y[i] = band.clamp_fish_y(self.y[i]);
        }
    }
}
