// record.rs - Painter that records draw calls
//
// Used by tests and headless hosts to inspect what a frame painted without
// rasterizing anything. Paths are stored already transformed.

use kurbo::{Affine, BezPath, Rect};

use super::{Layer, Paint, Painter, PathBuilder, StrokeStyle};
use crate::host::Surface;
use crate::world::Viewport;

#[derive(Clone, Debug)]
pub enum DrawOp {
    Layer(Layer),
    Clear { width: f64, height: f64 },
    Fill { path: BezPath, paint: Paint },
    Stroke { path: BezPath, paint: Paint, style: StrokeStyle },
    FillRect { rect: Rect, paint: Paint },
}

pub struct RecordingPainter {
    ops: Vec<DrawOp>,
    builder: PathBuilder,
    backing: (u32, u32),
    resizes: usize,
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            builder: PathBuilder::new(Affine::IDENTITY),
            backing: (0, 0),
            resizes: 0,
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Layer markers in the order they were emitted.
    pub fn layers(&self) -> Vec<Layer> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Layer(l) => Some(*l),
                _ => None,
            })
            .collect()
    }

    /// Ops between the first marker for `layer` and the next marker.
    pub fn ops_in(&self, layer: Layer) -> &[DrawOp] {
        let Some(start) = self
            .ops
            .iter()
            .position(|op| matches!(op, DrawOp::Layer(l) if *l == layer))
        else {
            return &[];
        };
        let rest = &self.ops[start + 1..];
        let end = rest
            .iter()
            .position(|op| matches!(op, DrawOp::Layer(_)))
            .unwrap_or(rest.len());
        &rest[..end]
    }

    /// Clears recorded so far.
    pub fn clear_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Clear { .. }))
            .count()
    }

    pub fn backing_size(&self) -> (u32, u32) {
        self.backing
    }

    pub fn resize_count(&self) -> usize {
        self.resizes
    }
}

impl Default for RecordingPainter {
    fn default() -> Self {
        Self::new()
    }
}

impl Painter for RecordingPainter {
    fn layer(&mut self, layer: Layer) {
        self.ops.push(DrawOp::Layer(layer));
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.ops.push(DrawOp::Clear { width, height });
    }

    fn save(&mut self) {
        self.builder.save();
    }

    fn restore(&mut self) {
        self.builder.restore();
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.builder.translate(dx, dy);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.builder.scale(sx, sy);
    }

    fn begin_path(&mut self) {
        self.builder.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        self.builder.quad_to(cx, cy, x, y);
    }

    fn curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        self.builder.curve_to(c1x, c1y, c2x, c2y, x, y);
    }

    fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) {
        self.builder.ellipse(cx, cy, rx, ry);
    }

    fn close_path(&mut self) {
        self.builder.close_path();
    }

    fn fill(&mut self, paint: &Paint) {
        self.ops.push(DrawOp::Fill {
            path: self.builder.path().clone(),
            paint: paint.clone(),
        });
    }

    fn stroke(&mut self, paint: &Paint, style: StrokeStyle) {
        self.ops.push(DrawOp::Stroke {
            path: self.builder.path().clone(),
            paint: paint.clone(),
            style,
        });
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: &Paint) {
        let p0 = self.builder.map(x, y);
        let p1 = self.builder.map(x + w, y + h);
        self.ops.push(DrawOp::FillRect {
            rect: Rect::from_points(p0, p1),
            paint: paint.clone(),
        });
    }
}

impl Surface for RecordingPainter {
    /// Records the backing size but keeps paths in CSS pixels.
    fn resize(&mut self, viewport: &Viewport) {
        self.backing = viewport.backing_size();
        self.resizes += 1;
        self.builder.reset(Affine::IDENTITY);
    }
}
