// render/ - Painting the scene
//
// `Painter` is a canvas-2d shaped drawing API; the browser context, the
// recording painter and the raster painter all implement it. All coordinates
// are CSS pixels, the surface applies the device pixel ratio itself.

mod layers;
mod path;
#[cfg(not(target_arch = "wasm32"))]
mod raster;
mod record;

pub use layers::paint_scene;
pub use path::PathBuilder;
#[cfg(not(target_arch = "wasm32"))]
pub use raster::RasterPainter;
pub use record::{DrawOp, RecordingPainter};

/// Paint layers, back to front. The order is fixed and defines visual depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Atmosphere,
    FishingRods,
    River,
    Fish,
    RiverBubbles,
    Vignette,
}

impl Layer {
    pub const ORDER: [Layer; 6] = [
        Layer::Atmosphere,
        Layer::FishingRods,
        Layer::River,
        Layer::Fish,
        Layer::RiverBubbles,
        Layer::Vignette,
    ];
}

/// Straight (non-premultiplied) colour, alpha in 0..=1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba { r: 0, g: 0, b: 0, a: 0.0 };

    pub fn white(a: f64) -> Self {
        Self { r: 255, g: 255, b: 255, a: a.clamp(0.0, 1.0) }
    }

    pub fn css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }

    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

/// Linear gradient in user space, stops sorted by offset.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    pub start: (f64, f64),
    pub end: (f64, f64),
    pub stops: Vec<(f64, Rgba)>,
}

impl LinearGradient {
    pub fn new(start: (f64, f64), end: (f64, f64)) -> Self {
        Self { start, end, stops: Vec::new() }
    }

    pub fn stop(mut self, offset: f64, color: Rgba) -> Self {
        self.stops.push((offset.clamp(0.0, 1.0), color));
        self
    }

    /// Colour at normalized position `t` along the gradient axis.
    pub fn sample(&self, t: f64) -> Rgba {
        let Some(&(first_off, first)) = self.stops.first() else {
            return Rgba::TRANSPARENT;
        };
        if t <= first_off {
            return first;
        }
        for pair in self.stops.windows(2) {
            let (o0, c0) = pair[0];
            let (o1, c1) = pair[1];
            if t <= o1 {
                let span = o1 - o0;
                let k = if span > 0.0 { (t - o0) / span } else { 1.0 };
                return c0.lerp(c1, k);
            }
        }
        self.stops.last().map(|&(_, c)| c).unwrap_or(first)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Linear(LinearGradient),
}

impl Paint {
    pub fn white(a: f64) -> Self {
        Paint::Solid(Rgba::white(a))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub width: f64,
    /// Round caps and joins instead of butt/miter.
    pub round: bool,
}

impl StrokeStyle {
    pub fn new(width: f64) -> Self {
        Self { width, round: false }
    }

    pub fn rounded(width: f64) -> Self {
        Self { width, round: true }
    }
}

pub trait Painter {
    /// Marks the start of a paint layer. Only recorders care.
    fn layer(&mut self, _layer: Layer) {}

    /// Clear `width x height` CSS pixels from the origin.
    fn clear(&mut self, width: f64, height: f64);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    fn scale(&mut self, sx: f64, sy: f64);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64);
    fn curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64);
    /// Full, axis-aligned ellipse as a new subpath.
    fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64);
    fn close_path(&mut self);

    fn fill(&mut self, paint: &Paint);
    fn stroke(&mut self, paint: &Paint, style: StrokeStyle);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: &Paint);
}
