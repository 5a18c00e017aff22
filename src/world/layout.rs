// layout.rs - Breakpoints and population sizing
//
// The only business rules of the backdrop: wider viewports get a taller
// river band, more fish, and fish that are larger and easier to see.

pub const BREAKPOINT_LG: f64 = 1024.0;
pub const BREAKPOINT_XL: f64 = 1280.0;
pub const BREAKPOINT_2XL: f64 = 1536.0;

/// Desktop viewports never show fewer fish than this.
pub const DESKTOP_MIN_FISH: usize = 7;

const GLOW_DOT_SPACING: f64 = 42.0;
const GLOW_DOTS_MIN: usize = 16;
const GLOW_DOTS_MAX: usize = 40;

pub fn is_desktop_width(width: f64) -> bool {
    width >= BREAKPOINT_LG
}

/// Top edge of the river band as a fraction of viewport height.
pub fn river_top_ratio(width: f64) -> f64 {
    if width >= BREAKPOINT_2XL {
        0.74
    } else if width >= BREAKPOINT_XL {
        0.76
    } else if width >= BREAKPOINT_LG {
        0.78
    } else {
        0.82
    }
}

pub fn fish_population(configured_min: usize, width: f64) -> usize {
    if is_desktop_width(width) {
        configured_min.max(DESKTOP_MIN_FISH)
    } else {
        configured_min
    }
}

pub fn glow_dot_count(width: f64) -> usize {
    let n = (width / GLOW_DOT_SPACING).round().max(0.0) as usize;
    n.clamp(GLOW_DOTS_MIN, GLOW_DOTS_MAX)
}

/// Scale range for newly spawned fish.
pub fn fish_scale_range(width: f64) -> (f64, f64) {
    if is_desktop_width(width) { (0.95, 1.45) } else { (0.7, 1.25) }
}

/// Alpha range for newly spawned fish.
pub fn fish_alpha_range(width: f64) -> (f64, f64) {
    if is_desktop_width(width) { (0.11, 0.2) } else { (0.05, 0.1) }
}

/// Like `f64::clamp` but tolerates `lo > hi` (tiny viewports), preferring `lo`.
#[inline]
pub fn clamp_soft(v: f64, lo: f64, hi: f64) -> f64 {
    v.min(hi).max(lo)
}
