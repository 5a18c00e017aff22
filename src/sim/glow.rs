// glow.rs - Twinkling glow dots
//
// Static positions, only the alpha breathes.

use super::rand_range;
use crate::world::{Viewport, glow_dot_count};

use std::f64::consts::TAU;

const TWINKLE_DEPTH: f64 = 0.02;

pub struct GlowDots {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub r: Vec<f64>,
    pub alpha: Vec<f64>,
    pub twinkle: Vec<f64>,
    pub twinkle_rate: Vec<f64>,
}

impl GlowDots {
    pub fn empty() -> Self {
        Self::with_capacity(0)
    }

    fn with_capacity(n: usize) -> Self {
        Self {
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            r: Vec::with_capacity(n),
            alpha: Vec::with_capacity(n),
            twinkle: Vec::with_capacity(n),
            twinkle_rate: Vec::with_capacity(n),
        }
    }

    /// Count comes from the viewport width, not from config
    pub fn generate(vp: &Viewport, rng: &mut u32) -> Self {
        let count = glow_dot_count(vp.width);
        let mut g = Self::with_capacity(count);
        for _ in 0..count {
            g.x.push(rand_range(rng, 0.0, vp.width));
            g.y.push(rand_range(rng, vp.height * 0.1, vp.height * 0.78));
            g.r.push(rand_range(rng, 0.5, 1.6));
            g.alpha.push(rand_range(rng, 0.03, 0.08));
            g.twinkle.push(rand_range(rng, 0.0, TAU));
            g.twinkle_rate.push(rand_range(rng, 0.006, 0.018));
        }
        g
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn update(&mut self, reduced_motion: bool) {
        if reduced_motion {
            return;
        }
        for (t, rate) in self.twinkle.iter_mut().zip(&self.twinkle_rate) {
            *t += rate;
        }
    }

    pub fn current_alpha(&self, i: usize) -> f64 {
        self.alpha[i] + self.twinkle[i].sin() * TWINKLE_DEPTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twinkle_keeps_alpha_near_base() {
        let mut rng = 21;
        let mut g = GlowDots::generate(&Viewport::new(1260.0, 700.0, 1.0), &mut rng);
        assert_eq!(g.len(), 30);
        for _ in 0..500 {
            g.update(false);
        }
        for i in 0..g.len() {
            assert!((g.current_alpha(i) - g.alpha[i]).abs() <= TWINKLE_DEPTH);
        }
    }

    #[test]
    fn reduced_motion_holds_twinkle_phase() {
        let mut rng = 2;
        let mut g = GlowDots::generate(&Viewport::new(600.0, 400.0, 1.0), &mut rng);
        let before = g.twinkle.clone();
        g.update(true);
        assert_eq!(g.twinkle, before);
    }
}
