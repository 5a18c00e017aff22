// path.rs - Current path + transform stack shared by the software painters

use kurbo::{Affine, BezPath, Ellipse, Point, Shape};

/// Ellipse flattening tolerance in CSS pixels.
const ELLIPSE_TOLERANCE: f64 = 0.05;

/// Canvas-style path state. Points are transformed when added, so the built
/// path is already in surface space.
pub struct PathBuilder {
    path: BezPath,
    transform: Affine,
    stack: Vec<Affine>,
}

impl PathBuilder {
    pub fn new(base: Affine) -> Self {
        Self {
            path: BezPath::new(),
            transform: base,
            stack: Vec::new(),
        }
    }

    /// Drop the path and saved states, start over from `base`.
    pub fn reset(&mut self, base: Affine) {
        self.path = BezPath::new();
        self.transform = base;
        self.stack.clear();
    }

    pub fn transform(&self) -> Affine {
        self.transform
    }

    pub fn path(&self) -> &BezPath {
        &self.path
    }

    pub fn save(&mut self) {
        self.stack.push(self.transform);
    }

    /// Unbalanced restores are ignored, as in canvas.
    pub fn restore(&mut self) {
        if let Some(t) = self.stack.pop() {
            self.transform = t;
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.transform = self.transform * Affine::translate((dx, dy));
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.transform = self.transform * Affine::scale_non_uniform(sx, sy);
    }

    pub fn begin_path(&mut self) {
        self.path = BezPath::new();
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        let p = self.map(x, y);
        self.path.move_to(p);
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        let p = self.map(x, y);
        if self.path.elements().is_empty() {
            self.path.move_to(p);
        } else {
            self.path.line_to(p);
        }
    }

    pub fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        let (c, p) = (self.map(cx, cy), self.map(x, y));
        self.path.quad_to(c, p);
    }

    pub fn curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        let (c1, c2, p) = (self.map(c1x, c1y), self.map(c2x, c2y), self.map(x, y));
        self.path.curve_to(c1, c2, p);
    }

    pub fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) {
        let mut shape = Ellipse::new((cx, cy), (rx, ry), 0.0).to_path(ELLIPSE_TOLERANCE);
        shape.apply_affine(self.transform);
        for el in shape.elements() {
            self.path.push(*el);
        }
    }

    pub fn close_path(&mut self) {
        self.path.close_path();
    }

    /// Uniform scale factor of the current transform, for stroke widths.
    pub fn scale_factor(&self) -> f64 {
        self.transform.determinant().abs().sqrt()
    }

    pub fn map(&self, x: f64, y: f64) -> Point {
        self.transform * Point::new(x, y)
    }
}
