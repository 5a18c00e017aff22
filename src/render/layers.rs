// layers.rs - Scene drawing routines
//
// Everything is white at low alpha; the page background provides the colour.
// Every alpha is multiplied by the configured opacity.

use super::{Layer, LinearGradient, Paint, Painter, Rgba, StrokeStyle};
use crate::sim::Scene;
use crate::world::surface_y;

const RING_WIDTH: f64 = 0.8;

/// Paint one frame, back to front. The caller clears the surface first.
pub fn paint_scene(scene: &Scene, p: &mut dyn Painter) {
    let opacity = scene.config().opacity;

    p.layer(Layer::Atmosphere);
    draw_atmosphere(scene, opacity, p);

    p.layer(Layer::FishingRods);
    draw_fishing_rods(scene, opacity, p);

    p.layer(Layer::River);
    draw_river(scene, opacity, p);

    p.layer(Layer::Fish);
    draw_fish(scene, opacity, p);

    p.layer(Layer::RiverBubbles);
    draw_river_bubbles(scene, opacity, p);

    p.layer(Layer::Vignette);
    draw_vignette(scene, opacity, p);
}

fn dot(p: &mut dyn Painter, x: f64, y: f64, r: f64, alpha: f64, opacity: f64) {
    p.begin_path();
    p.ellipse(x, y, r, r);
    p.fill(&Paint::white(alpha * opacity));
}

fn ring(p: &mut dyn Painter, x: f64, y: f64, r: f64, alpha: f64, opacity: f64) {
    p.begin_path();
    p.ellipse(x, y, r, r);
    p.stroke(&Paint::white(alpha * opacity), StrokeStyle::new(RING_WIDTH));
}

fn draw_atmosphere(scene: &Scene, opacity: f64, p: &mut dyn Painter) {
    let m = &scene.motes;
    for i in 0..m.len() {
        dot(p, m.x[i], m.y[i], m.r[i], m.alpha[i], opacity);
        if m.sparkle[i] {
            ring(p, m.x[i], m.y[i], m.r[i] + 0.8, m.alpha[i] * 0.45, opacity);
        }
    }

    // Depth only, no motion
    let g = &scene.glow;
    for i in 0..g.len() {
        dot(p, g.x[i], g.y[i], g.r[i], g.current_alpha(i), opacity);
    }
}

fn draw_fishing_rods(scene: &Scene, opacity: f64, p: &mut dyn Painter) {
    let vp = scene.viewport();
    let (w, h) = (vp.width, vp.height);
    let water = scene.band().top;
    let t = scene.time();

    let rod = Paint::white(0.085 * opacity);
    let line = Paint::white(0.06 * opacity);

    p.save();

    // Left rod, line and bobber
    p.begin_path();
    p.move_to(34.0, h - 22.0);
    p.quad_to(90.0, h * 0.65, 165.0, h * 0.36);
    p.stroke(&rod, StrokeStyle::rounded(1.35));

    p.begin_path();
    p.move_to(165.0, h * 0.36);
    p.curve_to(182.0, h * 0.5, 152.0, water - 32.0, 168.0, water + 6.0);
    p.stroke(&line, StrokeStyle::rounded(0.9));

    let bob = water + 6.0 + (t * 0.018).sin() * 1.5;
    dot(p, 168.0, bob, 2.6, 0.07, opacity);
    ring(p, 168.0, bob, 5.2, 0.03, opacity);

    // Right rod, mirrored and slightly shorter
    p.begin_path();
    p.move_to(w - 36.0, h - 24.0);
    p.quad_to(w - 92.0, h * 0.66, w - 176.0, h * 0.33);
    p.stroke(&rod, StrokeStyle::rounded(1.35));

    p.begin_path();
    p.move_to(w - 176.0, h * 0.33);
    p.curve_to(w - 194.0, h * 0.5, w - 158.0, water - 28.0, w - 176.0, water + 4.0);
    p.stroke(&line, StrokeStyle::rounded(0.9));

    let bob = water + 4.0 + (t * 0.016 + 1.2).sin() * 1.5;
    dot(p, w - 176.0, bob, 2.6, 0.07, opacity);
    ring(p, w - 176.0, bob, 5.2, 0.03, opacity);

    p.restore();
}

fn draw_river(scene: &Scene, opacity: f64, p: &mut dyn Painter) {
    let w = scene.viewport().width;
    let top = scene.band().top;
    let bottom = scene.viewport().height + 8.0;
    let t = scene.time();

    // Water body, brighter towards the bottom
    let body = LinearGradient::new((0.0, top - 10.0), (0.0, bottom))
        .stop(0.0, Rgba::white(0.015 * opacity))
        .stop(0.45, Rgba::white(0.03 * opacity))
        .stop(1.0, Rgba::white(0.06 * opacity));

    p.begin_path();
    p.move_to(-20.0, bottom);
    let mut x = -20.0;
    while x <= w + 20.0 {
        p.line_to(x, surface_y(x, top, 7.0, 2.5, t * 0.012));
        x += 8.0;
    }
    p.line_to(w + 20.0, bottom);
    p.close_path();
    p.fill(&Paint::Linear(body));

    // Wave lines, each deeper line a bit wider and brighter
    for i in 0..scene.config().wave_lines {
        let k = i as f64;
        let base = top + k * 14.0;
        let amp1 = 4.2 + k * 1.2;
        let amp2 = 1.8 + k * 0.7;
        let phase = t * (0.01 + k * 0.0018);

        p.begin_path();
        p.move_to(-10.0, surface_y(-10.0, base, amp1, amp2, phase));
        let mut x = -4.0;
        while x <= w + 10.0 {
            p.line_to(x, surface_y(x, base, amp1, amp2, phase));
            x += 6.0;
        }
        let width = if i == 0 { 1.2 } else { 1.0 };
        p.stroke(&Paint::white((0.05 + k * 0.015) * opacity), StrokeStyle::new(width));
    }

    // Shine along the surface, fading out at both edges
    let shine = LinearGradient::new((0.0, 0.0), (w, 0.0))
        .stop(0.0, Rgba::white(0.0))
        .stop(0.25, Rgba::white(0.03 * opacity))
        .stop(0.5, Rgba::white(0.05 * opacity))
        .stop(0.75, Rgba::white(0.03 * opacity))
        .stop(1.0, Rgba::white(0.0));

    p.begin_path();
    p.move_to(-10.0, surface_y(-10.0, top + 5.0, 3.0, 1.2, t * 0.008));
    let mut x = -2.0;
    while x <= w + 10.0 {
        p.line_to(x, surface_y(x, top + 5.0, 3.0, 1.2, t * 0.008));
        x += 8.0;
    }
    p.stroke(&Paint::Linear(shine), StrokeStyle::new(1.0));
}

fn draw_fish(scene: &Scene, opacity: f64, p: &mut dyn Painter) {
    let f = &scene.fish;
    let t = scene.time();
    let line_width = if scene.viewport().is_desktop() { 1.25 } else { 1.0 };

    for i in 0..f.len() {
        let s = f.scale[i];
        let y = f.y[i] + (f.sway[i] + t * f.sway_rate[i]).sin() * 3.6;
        let outline = Paint::white(f.alpha[i] * opacity);
        let style = StrokeStyle::rounded(line_width);

        p.save();
        p.translate(f.x[i], y);
        p.scale(f.facing[i], 1.0);

        // Body
        p.begin_path();
        p.ellipse(0.0, 0.0, 16.0 * s, 6.4 * s);
        p.fill(&Paint::white(f.alpha[i] * 0.12 * opacity));
        p.stroke(&outline, style);

        // Tail
        p.begin_path();
        p.move_to(-14.0 * s, 0.0);
        p.line_to(-24.0 * s, -7.0 * s);
        p.line_to(-28.0 * s, 0.0);
        p.line_to(-24.0 * s, 7.0 * s);
        p.close_path();
        p.stroke(&outline, style);

        // Fins
        p.begin_path();
        p.move_to(-2.0 * s, -4.5 * s);
        p.line_to(3.0 * s, -9.0 * s);
        p.line_to(8.0 * s, -3.5 * s);
        p.stroke(&outline, style);

        p.begin_path();
        p.move_to(-5.0 * s, 3.5 * s);
        p.line_to(5.0 * s, 7.5 * s);
        p.line_to(7.0 * s, 3.2 * s);
        p.stroke(&outline, style);

        // Eye
        dot(p, 8.0 * s, -0.8 * s, (0.7 * s).max(0.5), f.alpha[i] * 1.35, opacity);

        p.restore();
    }
}

fn draw_river_bubbles(scene: &Scene, opacity: f64, p: &mut dyn Painter) {
    let b = &scene.bubbles;
    let vp = scene.viewport();
    for i in 0..b.len() {
        if !b.is_visible(i, vp) {
            continue;
        }
        dot(p, b.x[i], b.y[i], b.r[i], b.alpha[i], opacity);
        if b.r[i] > 2.2 {
            ring(p, b.x[i], b.y[i], b.r[i] + 1.1, b.alpha[i] * 0.42, opacity);
        }
    }
}

fn draw_vignette(scene: &Scene, opacity: f64, p: &mut dyn Painter) {
    let vp = scene.viewport();
    let g = LinearGradient::new((0.0, 0.0), (0.0, vp.height))
        .stop(0.0, Rgba::white(0.01 * opacity))
        .stop(0.4, Rgba::white(0.0))
        .stop(1.0, Rgba::white(0.015 * opacity));
    p.fill_rect(0.0, 0.0, vp.width, vp.height, &Paint::Linear(g));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackgroundConfig;
    use crate::render::{DrawOp, RecordingPainter};
    use crate::world::Viewport;
    use kurbo::Shape;

    fn scene(width: f64) -> Scene {
        let mut s = Scene::new(BackgroundConfig::default(), 77);
        s.regenerate(Viewport::new(width, 900.0, 1.0));
        s
    }

    #[test]
    fn layers_are_painted_back_to_front() {
        let mut rec = RecordingPainter::new();
        paint_scene(&scene(1280.0), &mut rec);
        assert_eq!(rec.layers(), Layer::ORDER.to_vec());
    }

    #[test]
    fn one_stroke_per_wave_line_plus_shine() {
        let s = scene(1280.0);
        let mut rec = RecordingPainter::new();
        paint_scene(&s, &mut rec);
        let strokes = rec
            .ops_in(Layer::River)
            .iter()
            .filter(|op| matches!(op, DrawOp::Stroke { .. }))
            .count();
        assert_eq!(strokes, s.config().wave_lines + 1);
    }

    fn lone_fish_tail(facing: f64) -> kurbo::Rect {
        let config = BackgroundConfig {
            fish_count: 1,
            ..BackgroundConfig::default()
        };
        let mut s = Scene::new(config, 3);
        s.regenerate(Viewport::new(800.0, 900.0, 1.0));
        s.fish.x[0] = 400.0;
        s.fish.facing[0] = facing;

        let mut rec = RecordingPainter::new();
        paint_scene(&s, &mut rec);
        // body outline, tail, two fins
        let strokes: Vec<kurbo::Rect> = rec
            .ops_in(Layer::Fish)
            .iter()
            .filter_map(|op| match op {
                DrawOp::Stroke { path, .. } => Some(path.bounding_box()),
                _ => None,
            })
            .collect();
        assert_eq!(strokes.len(), 4);
        strokes[1]
    }

    #[test]
    fn mirrored_fish_trail_their_tail_on_the_right() {
        assert!(lone_fish_tail(1.0).x1 < 400.0);
        assert!(lone_fish_tail(-1.0).x0 > 400.0);
    }

    #[test]
    fn hidden_bubbles_are_skipped() {
        let mut s = scene(800.0);
        for y in s.bubbles.y.iter_mut() {
            *y = -500.0;
        }
        let mut rec = RecordingPainter::new();
        paint_scene(&s, &mut rec);
        assert!(rec.ops_in(Layer::RiverBubbles).is_empty());
    }
}
