// web.rs - Browser host
//
// Exposes `FishingBackground` to JS. The page creates a canvas once at the
// application root, constructs the backdrop on it and calls `mount()`;
// `unmount()` (or freeing the object) tears everything down.
//
// Callbacks hold weak references to the renderer, so dropping the renderer
// is enough to break every cycle.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::{Rc, Weak};

use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, CanvasRenderingContext2d, HtmlCanvasElement, MediaQueryList, Window,
};

use crate::config::BackgroundConfig;
use crate::error::{BackdropError, BackdropResult};
use crate::host::{
    FrameRequest, FrameScheduler, Host, MotionPreferenceObserver, Renderer, Surface,
    ViewportObserver,
};
use crate::render::{Paint, Painter, StrokeStyle};
use crate::world::Viewport;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

#[cfg(target_arch = "wasm32")]
const CONSOLE_LEVEL: tracing::Level = if cfg!(debug_assertions) {
    tracing::Level::DEBUG
} else {
    tracing::Level::INFO
};

/// Slot filled once the renderer exists; observers read it on attach.
type Callback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

type WebRenderer = Renderer<CanvasSurface, WebViewport, WebMotion, WebScheduler>;

// ============================================================================
// Canvas surface
// ============================================================================

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn acquire(canvas: &HtmlCanvasElement) -> BackdropResult<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| BackdropError::surface(format!("{e:?}")))?
            .ok_or_else(|| BackdropError::surface("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| BackdropError::surface("not a 2d context"))?;
        Ok(Self {
            canvas: canvas.clone(),
            ctx,
        })
    }

    fn set_fill(&self, paint: &Paint) {
        match paint {
            Paint::Solid(c) => self.ctx.set_fill_style_str(&c.css()),
            Paint::Linear(_) => {
                if let Some(g) = self.gradient(paint) {
                    self.ctx.set_fill_style_canvas_gradient(&g);
                }
            }
        }
    }

    fn set_stroke(&self, paint: &Paint, style: StrokeStyle) {
        match paint {
            Paint::Solid(c) => self.ctx.set_stroke_style_str(&c.css()),
            Paint::Linear(_) => {
                if let Some(g) = self.gradient(paint) {
                    self.ctx.set_stroke_style_canvas_gradient(&g);
                }
            }
        }
        self.ctx.set_line_width(style.width);
        if style.round {
            self.ctx.set_line_cap("round");
            self.ctx.set_line_join("round");
        } else {
            self.ctx.set_line_cap("butt");
            self.ctx.set_line_join("miter");
        }
    }

    fn gradient(&self, paint: &Paint) -> Option<web_sys::CanvasGradient> {
        let Paint::Linear(lg) = paint else {
            return None;
        };
        let g = self
            .ctx
            .create_linear_gradient(lg.start.0, lg.start.1, lg.end.0, lg.end.1);
        for (offset, color) in &lg.stops {
            g.add_color_stop(*offset as f32, &color.css()).ok()?;
        }
        Some(g)
    }
}

impl Painter for CanvasSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        let _ = self.ctx.translate(dx, dy);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        let _ = self.ctx.scale(sx, sy);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        self.ctx.quadratic_curve_to(cx, cy, x, y);
    }

    fn curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        self.ctx.bezier_curve_to(c1x, c1y, c2x, c2y, x, y);
    }

    fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) {
        let _ = self.ctx.ellipse(cx, cy, rx, ry, 0.0, 0.0, TAU);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn fill(&mut self, paint: &Paint) {
        self.set_fill(paint);
        self.ctx.fill();
    }

    fn stroke(&mut self, paint: &Paint, style: StrokeStyle) {
        self.set_stroke(paint, style);
        self.ctx.stroke();
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: &Paint) {
        self.set_fill(paint);
        self.ctx.fill_rect(x, y, w, h);
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, viewport: &Viewport) {
        let (w, h) = viewport.backing_size();
        self.canvas.set_width(w);
        self.canvas.set_height(h);

        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", viewport.width));
        let _ = style.set_property("height", &format!("{}px", viewport.height));

        let dpr = viewport.dpr;
        let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    }
}

/// Fixed, full-viewport, click-through, hidden from assistive tech.
fn apply_placement(canvas: &HtmlCanvasElement, z_index: i32) {
    let style = canvas.style();
    let props = [
        ("position", "fixed".to_string()),
        ("inset", "0".to_string()),
        ("display", "block".to_string()),
        ("pointer-events", "none".to_string()),
        ("overflow", "hidden".to_string()),
        ("z-index", z_index.to_string()),
    ];
    for (name, value) in props {
        let _ = style.set_property(name, &value);
    }
    let _ = canvas.set_attribute("aria-hidden", "true");
}

// ============================================================================
// Observers and scheduler
// ============================================================================

pub struct WebViewport {
    window: Window,
    on_resize: Callback,
}

impl ViewportObserver for WebViewport {
    fn measure(&self) -> Viewport {
        let width = self.window.inner_width().ok().and_then(|v| v.as_f64());
        let height = self.window.inner_height().ok().and_then(|v| v.as_f64());
        Viewport::new(
            width.unwrap_or(0.0),
            height.unwrap_or(0.0),
            self.window.device_pixel_ratio(),
        )
    }

    fn attach(&mut self) {
        if let Some(cb) = self.on_resize.borrow().as_ref() {
            let opts = AddEventListenerOptions::new();
            opts.set_passive(true);
            let _ = self
                .window
                .add_event_listener_with_callback_and_add_event_listener_options(
                    "resize",
                    cb.as_ref().unchecked_ref(),
                    &opts,
                );
        }
    }

    fn detach(&mut self) {
        if let Some(cb) = self.on_resize.borrow().as_ref() {
            let _ = self
                .window
                .remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
        }
    }
}

pub struct WebMotion {
    // None when matchMedia is missing or rejects the query
    query: Option<MediaQueryList>,
    on_change: Callback,
}

impl WebMotion {
    fn new(window: &Window, on_change: Callback) -> Self {
        Self {
            query: window.match_media(REDUCED_MOTION_QUERY).ok().flatten(),
            on_change,
        }
    }
}

impl MotionPreferenceObserver for WebMotion {
    fn prefers_reduced_motion(&self) -> Option<bool> {
        self.query.as_ref().map(MediaQueryList::matches)
    }

    fn attach(&mut self) {
        if let (Some(q), Some(cb)) = (self.query.as_ref(), self.on_change.borrow().as_ref()) {
            let _ = q.add_event_listener_with_callback("change", cb.as_ref().unchecked_ref());
        }
    }

    fn detach(&mut self) {
        if let (Some(q), Some(cb)) = (self.query.as_ref(), self.on_change.borrow().as_ref()) {
            let _ = q.remove_event_listener_with_callback("change", cb.as_ref().unchecked_ref());
        }
    }
}

pub struct WebScheduler {
    window: Window,
    on_frame: Callback,
}

impl FrameScheduler for WebScheduler {
    fn request_frame(&mut self) -> Option<FrameRequest> {
        let slot = self.on_frame.borrow();
        let cb = slot.as_ref()?;
        self.window
            .request_animation_frame(cb.as_ref().unchecked_ref())
            .ok()
            .map(FrameRequest)
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        let _ = self.window.cancel_animation_frame(request.0);
    }
}

fn callback(renderer: &Rc<RefCell<WebRenderer>>, f: fn(&mut WebRenderer)) -> Closure<dyn FnMut()> {
    let weak: Weak<RefCell<WebRenderer>> = Rc::downgrade(renderer);
    Closure::wrap(Box::new(move || {
        if let Some(r) = weak.upgrade() {
            if let Ok(mut r) = r.try_borrow_mut() {
                f(&mut r);
            }
        }
    }) as Box<dyn FnMut()>)
}

// ============================================================================
// JS entry point
// ============================================================================

/// Send panics and `tracing` events to the browser console. Runs when the
/// module is instantiated; later calls do nothing. A subscriber installed by
/// the embedding app is left alone.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn init_diagnostics() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        if !tracing::dispatcher::has_been_set() {
            let config = tracing_wasm::WASMLayerConfigBuilder::new()
                .set_max_level(CONSOLE_LEVEL)
                .build();
            tracing_wasm::set_as_global_default_with_config(config);
        }
    });
}

#[wasm_bindgen]
pub struct FishingBackground {
    canvas: HtmlCanvasElement,
    config: BackgroundConfig,
    renderer: Option<Rc<RefCell<WebRenderer>>>,
    callbacks: Vec<Callback>,
}

#[wasm_bindgen]
impl FishingBackground {
    /// `config_json` is an optional camelCase object, e.g.
    /// `{"opacity":0.8,"particleCount":85,"fishCount":5}`.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config_json: Option<String>) -> Result<FishingBackground, JsValue> {
        #[cfg(target_arch = "wasm32")]
        init_diagnostics();

        let config = match config_json {
            Some(json) => BackgroundConfig::from_json(&json).map_err(to_js)?,
            None => BackgroundConfig::default(),
        };
        Ok(Self {
            canvas,
            config,
            renderer: None,
            callbacks: Vec::new(),
        })
    }

    /// Start painting. A second call while mounted does nothing.
    pub fn mount(&mut self) {
        if self.renderer.is_some() {
            return;
        }
        let Some(window) = web_sys::window() else {
            debug!("no window, backdrop stays inert");
            return;
        };

        let surface = match CanvasSurface::acquire(&self.canvas) {
            Ok(s) => {
                apply_placement(&self.canvas, self.config.z_index);
                Some(s)
            }
            Err(err) => {
                debug!(%err, "canvas unavailable");
                None
            }
        };

        let on_frame: Callback = Rc::new(RefCell::new(None));
        let on_resize: Callback = Rc::new(RefCell::new(None));
        let on_motion: Callback = Rc::new(RefCell::new(None));

        let host = Host {
            viewport: WebViewport {
                window: window.clone(),
                on_resize: on_resize.clone(),
            },
            motion: WebMotion::new(&window, on_motion.clone()),
            scheduler: WebScheduler {
                window,
                on_frame: on_frame.clone(),
            },
        };

        let seed = (js_sys::Math::random() * u32::MAX as f64) as u32;
        let renderer = Rc::new(RefCell::new(Renderer::new(
            surface,
            host,
            self.config.clone(),
            seed,
        )));

        *on_frame.borrow_mut() = Some(callback(&renderer, WebRenderer::frame));
        *on_resize.borrow_mut() = Some(callback(&renderer, WebRenderer::resize));
        *on_motion.borrow_mut() = Some(callback(&renderer, WebRenderer::motion_preference_changed));

        renderer.borrow_mut().mount();

        self.renderer = Some(renderer);
        self.callbacks = vec![on_frame, on_resize, on_motion];
    }

    /// Cancel the pending frame, remove listeners, drop all state.
    pub fn unmount(&mut self) {
        if let Some(r) = self.renderer.take() {
            r.borrow_mut().teardown();
        }
        for slot in self.callbacks.drain(..) {
            slot.borrow_mut().take();
        }
    }

    /// Swap in new tuning; populations are regenerated.
    pub fn reconfigure(&mut self, config_json: &str) -> Result<(), JsValue> {
        let config = BackgroundConfig::from_json(config_json).map_err(to_js)?;
        if let Some(r) = &self.renderer {
            if r.borrow().is_running() {
                apply_placement(&self.canvas, config.z_index);
            }
            r.borrow_mut().reconfigure(config.clone());
        }
        self.config = config;
        Ok(())
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.renderer
            .as_ref()
            .is_some_and(|r| r.borrow().is_running())
    }
}

impl Drop for FishingBackground {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn to_js(err: BackdropError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn canvas() -> HtmlCanvasElement {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.create_element("canvas").ok())
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .unwrap()
    }

    #[wasm_bindgen_test]
    fn diagnostics_install_once() {
        init_diagnostics();
        init_diagnostics();
        assert!(tracing::dispatcher::has_been_set());
    }

    #[wasm_bindgen_test]
    fn mount_and_unmount_on_a_real_canvas() {
        let canvas = canvas();
        let mut bg = FishingBackground::new(canvas.clone(), Some(r#"{"zIndex": 3}"#.into())).unwrap();
        assert!(tracing::dispatcher::has_been_set());

        bg.mount();
        assert!(bg.is_running());
        assert_eq!(canvas.get_attribute("aria-hidden").as_deref(), Some("true"));
        assert_eq!(canvas.style().get_property_value("z-index").unwrap(), "3");

        bg.unmount();
        assert!(!bg.is_running());
    }

    #[wasm_bindgen_test]
    fn bad_config_is_rejected() {
        assert!(FishingBackground::new(canvas(), Some(r#"{"opacity": 4}"#.into())).is_err());
    }
}
