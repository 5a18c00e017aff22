// mote.rs - Ambient motes
//
// Tiny translucent dots drifting up through the page. Structure-of-Arrays
// like the other populations.

use super::rand_range;
use crate::world::Viewport;

use std::f64::consts::TAU;

const EDGE_MARGIN: f64 = 8.0;
const SPARKLE_MIN_RADIUS: f64 = 1.25;
const SPARKLE_CHANCE: f64 = 0.008;

pub struct Motes {
    // Position
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub r: Vec<f64>,

    // Drift
    pub vx: Vec<f64>,
    pub vy: Vec<f64>,
    pub wobble: Vec<f64>,
    pub wobble_rate: Vec<f64>,

    pub alpha: Vec<f64>,
    // Outline ring this frame
    pub sparkle: Vec<bool>,
}

impl Motes {
    pub fn empty() -> Self {
        Self::with_capacity(0)
    }

    fn with_capacity(n: usize) -> Self {
        Self {
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            r: Vec::with_capacity(n),
            vx: Vec::with_capacity(n),
            vy: Vec::with_capacity(n),
            wobble: Vec::with_capacity(n),
            wobble_rate: Vec::with_capacity(n),
            alpha: Vec::with_capacity(n),
            sparkle: Vec::with_capacity(n),
        }
    }

    /// Fresh population spread over the upper 86% of the viewport
    pub fn generate(count: usize, vp: &Viewport, rng: &mut u32) -> Self {
        let mut m = Self::with_capacity(count);
        for _ in 0..count {
            m.x.push(rand_range(rng, 0.0, vp.width));
            m.y.push(rand_range(rng, vp.height * 0.08, vp.height * 0.86));
            m.r.push(rand_range(rng, 0.6, 1.8));
            m.vx.push(rand_range(rng, -0.03, 0.03));
            m.vy.push(rand_range(rng, -0.06, -0.015));
            m.alpha.push(rand_range(rng, 0.04, 0.12));
            m.wobble.push(rand_range(rng, 0.0, TAU));
            m.wobble_rate.push(rand_range(rng, 0.004, 0.012));
            m.sparkle.push(false);
        }
        m
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Drift, wrap horizontally, respawn low once a mote floats off the top
    pub fn update(&mut self, vp: &Viewport, reduced_motion: bool, rng: &mut u32) {
        for i in 0..self.len() {
            if !reduced_motion {
                self.x[i] += self.vx[i] + self.wobble[i].sin() * 0.012;
                self.y[i] += self.vy[i];
                self.wobble[i] += self.wobble_rate[i];
            }

            if self.x[i] < -EDGE_MARGIN {
                self.x[i] = vp.width + EDGE_MARGIN;
            }
            if self.x[i] > vp.width + EDGE_MARGIN {
                self.x[i] = -EDGE_MARGIN;
            }
            if self.y[i] < -EDGE_MARGIN {
                self.y[i] = rand_range(rng, vp.height * 0.72, vp.height * 0.9);
                self.x[i] = rand_range(rng, 0.0, vp.width);
            }

            self.sparkle[i] =
                self.r[i] > SPARKLE_MIN_RADIUS && super::rand(rng) < SPARKLE_CHANCE;
        }
    }
}
