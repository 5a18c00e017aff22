// sim/ - Scene state and kinematics
//
// Entity management using Structure-of-Arrays, one module per population.
// Every population is rebuilt from scratch on resize or reconfigure; nothing
// is carried over or rescaled.

mod bubble;
mod fish;
mod glow;
mod mote;

pub use bubble::RiverBubbles;
pub use fish::{EXIT_MARGIN, FishSchool};
pub use glow::GlowDots;
pub use mote::Motes;

use crate::config::BackgroundConfig;
use crate::world::{RiverBand, Viewport, fish_population};

/// Clock advance per frame.
pub const TICK: f64 = 1.0;
/// Clock advance per frame under reduced motion. Phases keep moving, slowly.
pub const REDUCED_TICK: f64 = 0.25;

const DEFAULT_SEED: u32 = 0xDEAD_BEEF;

/// All per-instance state of one mounted backdrop
pub struct Scene {
    config: BackgroundConfig,
    viewport: Viewport,
    band: RiverBand,

    // Entities
    pub motes: Motes,
    pub bubbles: RiverBubbles,
    pub fish: FishSchool,
    pub glow: GlowDots,

    time: f64,
    reduced_motion: bool,
    generation: u64,

    // RNG state
    rng: u32,
}

impl Scene {
    pub fn new(config: BackgroundConfig, seed: u32) -> Self {
        let viewport = Viewport::default();
        Self {
            config,
            band: RiverBand::for_viewport(&viewport),
            viewport,
            motes: Motes::empty(),
            bubbles: RiverBubbles::empty(),
            fish: FishSchool::empty(),
            glow: GlowDots::empty(),
            time: 0.0,
            reduced_motion: false,
            generation: 0,
            // xorshift gets stuck on zero
            rng: if seed == 0 { DEFAULT_SEED } else { seed },
        }
    }

    /// Replace every population with one sized for `viewport`.
    pub fn regenerate(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.band = RiverBand::for_viewport(&viewport);

        let rng = &mut self.rng;
        self.motes = Motes::generate(self.config.particle_count, &viewport, rng);
        self.bubbles = RiverBubbles::generate(self.config.bubble_count, &viewport, &self.band, rng);
        self.fish = FishSchool::generate(
            fish_population(self.config.fish_count, viewport.width),
            &viewport,
            &self.band,
            rng,
        );
        self.glow = GlowDots::generate(&viewport, rng);
        self.generation += 1;
    }

    /// New tuning applies through regeneration, never to live entities.
    pub fn reconfigure(&mut self, config: BackgroundConfig) {
        self.config = config;
        self.regenerate(self.viewport);
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    pub fn advance_clock(&mut self) {
        self.time += if self.reduced_motion { REDUCED_TICK } else { TICK };
    }

    /// Kinematics for one frame. Runs after the frame has been painted.
    pub fn update(&mut self) {
        let vp = self.viewport;
        let reduced = self.reduced_motion;
        self.fish.update(&vp, &self.band, reduced, &mut self.rng);
        self.motes.update(&vp, reduced, &mut self.rng);
        self.bubbles.update(&vp, reduced, &mut self.rng);
        self.glow.update(reduced);
    }

    pub fn config(&self) -> &BackgroundConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn band(&self) -> &RiverBand {
        &self.band
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Bumped on every regeneration.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

// Random number generator (xorshift32), uniform in [0, 1)
#[inline(always)]
pub fn rand(rng: &mut u32) -> f64 {
    *rng ^= *rng << 13;
    *rng ^= *rng >> 17;
    *rng ^= *rng << 5;
    (*rng >> 8) as f64 * (1.0 / 16_777_216.0)
}

#[inline(always)]
pub fn rand_range(rng: &mut u32, min: f64, max: f64) -> f64 {
    rand(rng) * (max - min) + min
}
