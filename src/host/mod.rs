// host/ - Host collaborators and the renderer lifecycle
//
// The renderer never talks to a browser directly. It measures the viewport,
// reads the motion preference and schedules repaints through the traits
// below; the web module and the headless doubles implement them.
//
//   Uninitialized --mount--> Running --teardown--> TornDown
//
// Resize and motion-preference events keep it Running. A torn down renderer
// is never revived; mount a new one instead.

pub mod headless;

use tracing::{debug, info};

use crate::config::BackgroundConfig;
use crate::render::{Painter, paint_scene};
use crate::sim::Scene;
use crate::world::Viewport;

/// Opaque id of a scheduled repaint, as handed out by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRequest(pub i32);

pub trait ViewportObserver {
    fn measure(&self) -> Viewport;
    /// Start delivering resize notifications to the renderer.
    fn attach(&mut self);
    fn detach(&mut self);
}

pub trait MotionPreferenceObserver {
    /// `None` when the host cannot answer the query.
    fn prefers_reduced_motion(&self) -> Option<bool>;
    fn attach(&mut self);
    fn detach(&mut self);
}

/// One callback per display refresh, request/cancel pair.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> Option<FrameRequest>;
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Drawing surface owned by the renderer.
pub trait Surface: Painter {
    /// Resize the backing store to the viewport's backing resolution and
    /// reset the transform so drawing uses CSS pixels.
    fn resize(&mut self, viewport: &Viewport);
}

/// The host collaborators one renderer depends on.
pub struct Host<V, M, F> {
    pub viewport: V,
    pub motion: M,
    pub scheduler: F,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Running,
    TornDown,
}

pub struct Renderer<S, V, M, F> {
    surface: Option<S>,
    host: Host<V, M, F>,
    scene: Scene,
    seed: u32,
    state: Lifecycle,
    pending: Option<FrameRequest>,
}

impl<S, V, M, F> Renderer<S, V, M, F>
where
    S: Surface,
    V: ViewportObserver,
    M: MotionPreferenceObserver,
    F: FrameScheduler,
{
    /// `surface` is `None` when the host could not provide one; the renderer
    /// then stays inert.
    pub fn new(surface: Option<S>, host: Host<V, M, F>, config: BackgroundConfig, seed: u32) -> Self {
        Self {
            surface,
            host,
            scene: Scene::new(config, seed),
            seed,
            state: Lifecycle::Uninitialized,
            pending: None,
        }
    }

    pub fn mount(&mut self) {
        if self.state != Lifecycle::Uninitialized {
            return;
        }
        if self.surface.is_none() {
            debug!("no drawing surface, backdrop stays inert");
            return;
        }

        let reduced = self.host.motion.prefers_reduced_motion().unwrap_or(false);
        self.scene.set_reduced_motion(reduced);

        let vp = self.host.viewport.measure();
        self.apply_viewport(vp);

        self.host.viewport.attach();
        self.host.motion.attach();
        self.state = Lifecycle::Running;

        info!(
            width = vp.width,
            height = vp.height,
            dpr = vp.dpr,
            motes = self.scene.motes.len(),
            bubbles = self.scene.bubbles.len(),
            fish = self.scene.fish.len(),
            glow = self.scene.glow.len(),
            reduced_motion = reduced,
            "backdrop mounted"
        );

        self.frame();
    }

    /// Resize notification: new backing store and brand new populations.
    pub fn resize(&mut self) {
        if self.state != Lifecycle::Running {
            return;
        }
        let vp = self.host.viewport.measure();
        self.apply_viewport(vp);
        debug!(
            width = vp.width,
            height = vp.height,
            dpr = vp.dpr,
            generation = self.scene.generation(),
            "backdrop regenerated after resize"
        );
    }

    /// Motion preference flipped. Entities are kept as they are.
    pub fn motion_preference_changed(&mut self) {
        if self.state != Lifecycle::Running {
            return;
        }
        let reduced = self.host.motion.prefers_reduced_motion().unwrap_or(false);
        if reduced != self.scene.reduced_motion() {
            debug!(reduced_motion = reduced, "motion preference changed");
        }
        self.scene.set_reduced_motion(reduced);
    }

    /// New tuning. Applied by regenerating, never to live entities.
    pub fn reconfigure(&mut self, config: BackgroundConfig) {
        if self.state == Lifecycle::TornDown {
            return;
        }
        self.scene.reconfigure(config);
        debug!(generation = self.scene.generation(), "backdrop reconfigured");
    }

    /// Repaint callback. Schedules the next frame before painting this one.
    pub fn frame(&mut self) {
        if self.state != Lifecycle::Running {
            return;
        }
        self.pending = self.host.scheduler.request_frame();

        // Initial layout can report zero; keep polling until it settles
        if self.scene.viewport().is_empty() {
            let vp = self.host.viewport.measure();
            if vp.is_empty() {
                return;
            }
            self.apply_viewport(vp);
        }

        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let vp = *self.scene.viewport();

        self.scene.advance_clock();
        surface.clear(vp.width, vp.height);
        paint_scene(&self.scene, surface);
        self.scene.update();
    }

    /// Cancel the pending repaint, then detach observers. Idempotent.
    pub fn teardown(&mut self) {
        if self.state == Lifecycle::TornDown {
            return;
        }
        if let Some(request) = self.pending.take() {
            self.host.scheduler.cancel_frame(request);
        }
        if self.state == Lifecycle::Running {
            self.host.viewport.detach();
            self.host.motion.detach();
        }

        let config = self.scene.config().clone();
        self.scene = Scene::new(config, self.seed);
        self.state = Lifecycle::TornDown;
        debug!("backdrop torn down");
    }

    fn apply_viewport(&mut self, vp: Viewport) {
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(&vp);
        }
        self.scene.regenerate(vp);
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == Lifecycle::Running
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn pending_frame(&self) -> Option<FrameRequest> {
        self.pending
    }

    pub fn host(&self) -> &Host<V, M, F> {
        &self.host
    }

    pub fn into_surface(self) -> Option<S> {
        self.surface
    }
}
