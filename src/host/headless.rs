// headless.rs - In-process host doubles
//
// Cheap cloneable handles over shared cells. Keep a clone outside the
// renderer to simulate resizes, preference flips and to inspect scheduled
// repaints without a display.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{FrameRequest, FrameScheduler, Host, MotionPreferenceObserver, ViewportObserver};
use crate::world::Viewport;

#[derive(Clone)]
pub struct HeadlessViewport {
    current: Rc<Cell<Viewport>>,
    attached: Rc<Cell<bool>>,
}

impl HeadlessViewport {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            current: Rc::new(Cell::new(viewport)),
            attached: Rc::new(Cell::new(false)),
        }
    }

    /// Change what the next `measure` reports. The caller still has to
    /// deliver the resize notification.
    pub fn set(&self, viewport: Viewport) {
        self.current.set(viewport);
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }
}

impl ViewportObserver for HeadlessViewport {
    fn measure(&self) -> Viewport {
        self.current.get()
    }

    fn attach(&mut self) {
        self.attached.set(true);
    }

    fn detach(&mut self) {
        self.attached.set(false);
    }
}

#[derive(Clone)]
pub struct HeadlessMotion {
    reduced: Rc<Cell<Option<bool>>>,
    attached: Rc<Cell<bool>>,
}

impl HeadlessMotion {
    /// `None` behaves like a host without `prefers-reduced-motion` support.
    pub fn new(reduced: Option<bool>) -> Self {
        Self {
            reduced: Rc::new(Cell::new(reduced)),
            attached: Rc::new(Cell::new(false)),
        }
    }

    pub fn set(&self, reduced: Option<bool>) {
        self.reduced.set(reduced);
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }
}

impl MotionPreferenceObserver for HeadlessMotion {
    fn prefers_reduced_motion(&self) -> Option<bool> {
        self.reduced.get()
    }

    fn attach(&mut self) {
        self.attached.set(true);
    }

    fn detach(&mut self) {
        self.attached.set(false);
    }
}

#[derive(Default)]
struct Schedule {
    next_id: i32,
    pending: Vec<i32>,
    cancelled: Vec<i32>,
}

/// Hands out increasing ids; repaints only happen when the test or CLI
/// calls `Renderer::frame` itself.
#[derive(Clone, Default)]
pub struct HeadlessScheduler {
    state: Rc<RefCell<Schedule>>,
}

impl HeadlessScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Vec<i32> {
        self.state.borrow().pending.clone()
    }

    pub fn cancelled(&self) -> Vec<i32> {
        self.state.borrow().cancelled.clone()
    }

    pub fn requested(&self) -> i32 {
        self.state.borrow().next_id
    }
}

impl FrameScheduler for HeadlessScheduler {
    fn request_frame(&mut self) -> Option<FrameRequest> {
        let mut s = self.state.borrow_mut();
        s.next_id += 1;
        let id = s.next_id;
        // A repaint fires at most once, so an older request is spent by now
        s.pending.clear();
        s.pending.push(id);
        Some(FrameRequest(id))
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        let mut s = self.state.borrow_mut();
        s.pending.retain(|&id| id != request.0);
        s.cancelled.push(request.0);
    }
}

pub type HeadlessHost = Host<HeadlessViewport, HeadlessMotion, HeadlessScheduler>;

impl HeadlessHost {
    /// Host for `viewport` with no motion preference.
    pub fn headless(viewport: Viewport) -> Self {
        Host {
            viewport: HeadlessViewport::new(viewport),
            motion: HeadlessMotion::new(Some(false)),
            scheduler: HeadlessScheduler::new(),
        }
    }
}
