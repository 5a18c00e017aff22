// raster.rs - Software painter backed by vello_cpu
//
// Paths are built in device space by `PathBuilder` and handed to a
// `vello_cpu::RenderContext`; gradients keep their CSS-pixel coordinates
// through the paint transform. The pixmap is read back as straight-alpha
// RGBA for PNG output.

use image::RgbaImage;
use kurbo::{Affine, BezPath, PathEl, Point};
use vello_cpu::kurbo as cpu;
use vello_cpu::peniko::{self, ColorStop};

use super::{Paint, Painter, PathBuilder, Rgba, StrokeStyle};
use crate::host::Surface;
use crate::world::Viewport;

pub struct RasterPainter {
    // None while the backing store is zero-sized
    ctx: Option<vello_cpu::RenderContext>,
    width: u16,
    height: u16,
    builder: PathBuilder,
}

impl RasterPainter {
    pub fn new() -> Self {
        Self {
            ctx: None,
            width: 0,
            height: 0,
            builder: PathBuilder::new(Affine::IDENTITY),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (u32::from(self.width), u32::from(self.height))
    }

    /// Render everything painted since the last clear.
    pub fn snapshot(&mut self) -> RgbaImage {
        let Some(ctx) = self.ctx.as_mut() else {
            return RgbaImage::new(u32::from(self.width), u32::from(self.height));
        };
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        unpremultiply(&pixmap, self.width, self.height)
    }

    pub fn into_image(mut self) -> RgbaImage {
        self.snapshot()
    }

    fn draw(&mut self, path: &BezPath, paint: &Paint, stroke: Option<StrokeStyle>) {
        let scale = self.builder.scale_factor();
        let paint_transform = self.builder.transform();
        let Some(ctx) = self.ctx.as_mut() else {
            return;
        };
        if !set_paint(ctx, paint, paint_transform) {
            return;
        }

        ctx.set_transform(cpu::Affine::IDENTITY);
        let path = bezpath_to_cpu(path);
        match stroke {
            Some(style) => {
                let mut s = cpu::Stroke::new(style.width * scale);
                if style.round {
                    s = s.with_caps(cpu::Cap::Round).with_join(cpu::Join::Round);
                }
                ctx.set_stroke(s);
                ctx.stroke_path(&path);
            }
            None => ctx.fill_path(&path),
        }
    }
}

impl Default for RasterPainter {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns false when there is nothing visible to paint.
fn set_paint(ctx: &mut vello_cpu::RenderContext, paint: &Paint, transform: Affine) -> bool {
    match paint {
        Paint::Solid(c) => {
            ctx.set_paint_transform(cpu::Affine::IDENTITY);
            ctx.set_paint(color_to_cpu(*c));
        }
        Paint::Linear(lg) => {
            if lg.stops.is_empty() {
                return false;
            }
            let stops: Vec<ColorStop> = lg
                .stops
                .iter()
                .map(|(offset, c)| ColorStop::from((*offset as f32, color_to_cpu(*c))))
                .collect();
            let gradient = peniko::Gradient::new_linear(lg.start, lg.end).with_stops(stops.as_slice());
            ctx.set_paint_transform(cpu::Affine::new(transform.as_coeffs()));
            ctx.set_paint(gradient);
        }
    }
    true
}

fn color_to_cpu(c: Rgba) -> peniko::Color {
    let a = (c.a.clamp(0.0, 1.0) * 255.0).round() as u8;
    peniko::Color::from_rgba8(c.r, c.g, c.b, a)
}

fn point_to_cpu(p: Point) -> cpu::Point {
    cpu::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> cpu::BezPath {
    let mut out = cpu::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// vello_cpu stores premultiplied RGBA8; PNG wants straight alpha.
fn unpremultiply(pixmap: &vello_cpu::Pixmap, width: u16, height: u16) -> RgbaImage {
    let mut data = pixmap.data_as_u8_slice().to_vec();
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    RgbaImage::from_raw(u32::from(width), u32::from(height), data)
        .unwrap_or_else(|| RgbaImage::new(u32::from(width), u32::from(height)))
}

impl Painter for RasterPainter {
    /// Drops everything painted so far. Canvas clears only the given rect,
    /// but every caller clears the whole viewport.
    fn clear(&mut self, _width: f64, _height: f64) {
        if let Some(ctx) = self.ctx.as_mut() {
            ctx.reset();
        }
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
        let path = self.builder.path().clone();
        self.draw(&path, paint, None);
    }

    fn stroke(&mut self, paint: &Paint, style: StrokeStyle) {
        let path = self.builder.path().clone();
        self.draw(&path, paint, Some(style));
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: &Paint) {
        let mut rect = BezPath::new();
        rect.move_to(self.builder.map(x, y));
        rect.line_to(self.builder.map(x + w, y));
        rect.line_to(self.builder.map(x + w, y + h));
        rect.line_to(self.builder.map(x, y + h));
        rect.close_path();
        self.draw(&rect, paint, None);
    }
}

impl Surface for RasterPainter {
    fn resize(&mut self, viewport: &Viewport) {
        let (w, h) = viewport.backing_size();
        self.width = u16::try_from(w).unwrap_or(u16::MAX);
        self.height = u16::try_from(h).unwrap_or(u16::MAX);
        self.ctx = (self.width > 0 && self.height > 0)
            .then(|| vello_cpu::RenderContext::new(self.width, self.height));
        self.builder.reset(Affine::scale(viewport.dpr));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn painter(w: f64, h: f64, dpr: f64) -> RasterPainter {
        let mut p = RasterPainter::new();
        p.resize(&Viewport::new(w, h, dpr));
        p
    }

    fn dot_alphas(cx: f64, cy: f64) -> Vec<u8> {
        let mut p = painter(20.0, 20.0, 1.0);
        p.begin_path();
        p.ellipse(cx, cy, 0.5, 0.5);
        p.fill(&Paint::white(0.2));
        p.snapshot().pixels().map(|px| px[3]).filter(|&a| a > 0).collect()
    }

    #[test]
    fn resize_allocates_backing_resolution() {
        let mut p = painter(100.0, 50.0, 2.0);
        assert_eq!(p.dimensions(), (200, 100));
        assert_eq!(p.snapshot().dimensions(), (200, 100));
    }

    #[test]
    fn zero_sized_surface_paints_nothing() {
        let mut p = painter(0.0, 0.0, 1.0);
        p.fill_rect(0.0, 0.0, 10.0, 10.0, &Paint::white(1.0));
        assert_eq!(p.snapshot().dimensions(), (0, 0));
    }

    #[test]
    fn filled_circle_covers_its_centre_only() {
        let mut p = painter(40.0, 40.0, 1.0);
        p.begin_path();
        p.ellipse(20.0, 20.0, 5.0, 5.0);
        p.fill(&Paint::white(1.0));
        let img = p.snapshot();
        assert_eq!(img.get_pixel(20, 20)[3], 255);
        assert_eq!(img.get_pixel(20, 20)[0], 255);
        assert_eq!(img.get_pixel(2, 2)[3], 0);
    }

    #[test]
    fn sub_pixel_dots_get_partial_coverage() {
        // Centred on a pixel corner: spread over its four neighbours
        let corner = dot_alphas(10.0, 10.0);
        assert!(!corner.is_empty());
        assert!(corner.iter().all(|&a| a < 51), "{corner:?}");

        // Centred in a pixel: one pixel, never at the full paint alpha
        let centre = dot_alphas(10.5, 10.5);
        assert!(!centre.is_empty());
        assert!(centre.iter().all(|&a| a < 51), "{centre:?}");
    }

    #[test]
    fn stroke_marks_pixels_along_the_line() {
        let mut p = painter(20.0, 20.0, 1.0);
        p.begin_path();
        p.move_to(0.0, 10.5);
        p.line_to(20.0, 10.5);
        p.stroke(&Paint::white(0.5), StrokeStyle::new(1.0));
        let img = p.snapshot();
        assert!((120..=136).contains(&img.get_pixel(7, 10)[3]));
        assert_eq!(img.get_pixel(7, 2)[3], 0);
    }

    #[test]
    fn gradient_follows_css_coordinates_under_dpr() {
        use crate::render::LinearGradient;

        let mut p = painter(10.0, 10.0, 2.0);
        let g = LinearGradient::new((0.0, 0.0), (0.0, 10.0))
            .stop(0.0, Rgba::white(0.0))
            .stop(1.0, Rgba::white(1.0));
        p.fill_rect(0.0, 0.0, 10.0, 10.0, &Paint::Linear(g));
        let img = p.snapshot();
        assert!(img.get_pixel(10, 1)[3] < 40);
        assert!(img.get_pixel(10, 18)[3] > 200);
    }

    #[test]
    fn clear_resets_pixels() {
        let mut p = painter(10.0, 10.0, 2.0);
        p.fill_rect(0.0, 0.0, 10.0, 10.0, &Paint::white(1.0));
        assert_eq!(p.snapshot().get_pixel(19, 19)[3], 255);
        p.clear(10.0, 10.0);
        assert!(p.snapshot().pixels().all(|px| px[3] == 0));
    }
}
