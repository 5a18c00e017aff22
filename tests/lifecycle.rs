use river_engine::host::headless::{
    HeadlessHost, HeadlessMotion, HeadlessScheduler, HeadlessViewport,
};
use river_engine::{BackgroundConfig, Layer, Lifecycle, RecordingPainter, Renderer, Viewport};

type TestRenderer = Renderer<RecordingPainter, HeadlessViewport, HeadlessMotion, HeadlessScheduler>;

/// Outside handles onto the host the renderer owns.
struct Handles {
    viewport: HeadlessViewport,
    motion: HeadlessMotion,
    scheduler: HeadlessScheduler,
}

fn renderer_with(vp: Viewport, config: BackgroundConfig) -> (TestRenderer, Handles) {
    let host = HeadlessHost::headless(vp);
    let handles = Handles {
        viewport: host.viewport.clone(),
        motion: host.motion.clone(),
        scheduler: host.scheduler.clone(),
    };
    let renderer = Renderer::new(Some(RecordingPainter::new()), host, config, 42);
    (renderer, handles)
}

fn renderer(vp: Viewport) -> (TestRenderer, Handles) {
    renderer_with(vp, BackgroundConfig::default())
}

fn desktop() -> Viewport {
    Viewport::new(1440.0, 900.0, 1.0)
}

fn ops_len(r: &TestRenderer) -> usize {
    r.surface().map_or(0, |s| s.ops().len())
}

#[test]
fn mount_paints_first_frame_and_schedules_next() {
    let (mut r, h) = renderer(desktop());
    assert_eq!(r.state(), Lifecycle::Uninitialized);

    r.mount();

    assert!(r.is_running());
    assert!(h.viewport.is_attached());
    assert!(h.motion.is_attached());
    assert_eq!(h.scheduler.pending(), vec![1]);

    let surface = r.surface().unwrap();
    assert_eq!(surface.clear_count(), 1);
    assert_eq!(surface.layers(), Layer::ORDER.to_vec());
    assert_eq!(surface.backing_size(), (1440, 900));
    assert_eq!(r.scene().time(), 1.0);
}

#[test]
fn every_frame_repaints_all_layers_in_order() {
    let (mut r, _h) = renderer(desktop());
    r.mount();
    for _ in 0..4 {
        r.frame();
    }
    let surface = r.surface().unwrap();
    assert_eq!(surface.clear_count(), 5);
    let expected: Vec<Layer> = Layer::ORDER.iter().copied().cycle().take(30).collect();
    assert_eq!(surface.layers(), expected);
    assert_eq!(r.scene().time(), 5.0);
}

#[test]
fn missing_surface_keeps_renderer_inert() {
    let host = HeadlessHost::headless(desktop());
    let mut r: TestRenderer = Renderer::new(None, host, BackgroundConfig::default(), 1);

    r.mount();
    r.frame();

    assert_eq!(r.state(), Lifecycle::Uninitialized);
    assert_eq!(r.host().scheduler.requested(), 0);
    assert!(!r.host().viewport.is_attached());
    assert!(!r.host().motion.is_attached());

    r.teardown();
    assert_eq!(r.state(), Lifecycle::TornDown);
    assert!(r.host().scheduler.cancelled().is_empty());
}

#[test]
fn teardown_cancels_pending_frame_and_detaches() {
    let (mut r, h) = renderer(desktop());
    r.mount();
    r.frame();
    let pending = h.scheduler.pending();
    assert_eq!(pending.len(), 1);

    r.teardown();

    assert_eq!(r.state(), Lifecycle::TornDown);
    assert_eq!(h.scheduler.cancelled(), pending);
    assert!(h.scheduler.pending().is_empty());
    assert!(r.pending_frame().is_none());
    assert!(!h.viewport.is_attached());
    assert!(!h.motion.is_attached());
}

#[test]
fn no_painting_after_teardown() {
    let (mut r, h) = renderer(desktop());
    r.mount();
    r.teardown();
    let ops = ops_len(&r);
    let requested = h.scheduler.requested();

    // A callback that was already in flight when teardown ran
    r.frame();
    r.resize();
    r.motion_preference_changed();
    r.reconfigure(BackgroundConfig::site_root());
    r.mount();

    assert_eq!(ops_len(&r), ops);
    assert_eq!(h.scheduler.requested(), requested);
    assert_eq!(r.state(), Lifecycle::TornDown);
    assert!(!h.viewport.is_attached());
}

#[test]
fn double_teardown_is_a_noop() {
    let (mut r, h) = renderer(desktop());
    r.mount();
    r.teardown();
    r.teardown();
    assert_eq!(h.scheduler.cancelled().len(), 1);
    assert_eq!(r.state(), Lifecycle::TornDown);
}

#[test]
fn teardown_releases_entities() {
    let (mut r, _h) = renderer(desktop());
    r.mount();
    assert!(!r.scene().fish.is_empty());
    r.teardown();
    assert!(r.scene().fish.is_empty());
    assert!(r.scene().motes.is_empty());
    assert!(r.scene().bubbles.is_empty());
    assert!(r.scene().glow.is_empty());
}

#[test]
fn zero_viewport_defers_painting_until_layout_settles() {
    let (mut r, h) = renderer(Viewport::new(0.0, 0.0, 1.0));
    r.mount();

    assert!(r.is_running());
    assert_eq!(r.surface().unwrap().clear_count(), 0);
    assert_eq!(h.scheduler.pending().len(), 1);

    r.frame();
    assert_eq!(r.surface().unwrap().clear_count(), 0);
    assert_eq!(h.scheduler.requested(), 2);

    h.viewport.set(Viewport::new(1280.0, 720.0, 1.0));
    r.frame();

    let surface = r.surface().unwrap();
    assert_eq!(surface.clear_count(), 1);
    assert_eq!(surface.backing_size(), (1280, 720));
    assert_eq!(r.scene().fish.len(), 7);
}

#[test]
fn resize_rebuilds_populations_for_the_new_viewport() {
    let (mut r, h) = renderer(desktop());
    r.mount();
    let generation = r.scene().generation();
    assert_eq!(r.scene().fish.len(), 7);
    assert_eq!(r.scene().glow.len(), 34);

    let motes_x = r.scene().motes.x.clone();
    let bubbles_y = r.scene().bubbles.y.clone();
    let glow_x = r.scene().glow.x.clone();

    h.viewport.set(Viewport::new(800.0, 600.0, 2.0));
    r.resize();

    let scene = r.scene();
    assert_eq!(scene.generation(), generation + 1);
    // Same counts, fresh arrays: nothing is carried over or rescaled
    assert_ne!(scene.motes.x, motes_x);
    assert_ne!(scene.bubbles.y, bubbles_y);
    assert_ne!(scene.glow.x, glow_x);
    assert_eq!(scene.fish.len(), 3);
    assert_eq!(scene.glow.len(), 19);
    assert_eq!(scene.motes.len(), 55);
    assert_eq!(scene.bubbles.len(), 12);
    assert!((scene.band().top - 492.0).abs() < 1e-9);

    let surface = r.surface().unwrap();
    assert_eq!(surface.backing_size(), (1600, 1200));
    assert_eq!(surface.resize_count(), 2);
    assert!(r.is_running());
}

#[test]
fn resize_to_the_same_viewport_still_replaces_entities() {
    let (mut r, _h) = renderer(desktop());
    r.mount();
    r.frame();
    let fish_x = r.scene().fish.x.clone();
    let fish_y = r.scene().fish.y.clone();
    let mote_y = r.scene().motes.y.clone();

    r.resize();

    let scene = r.scene();
    assert_eq!(scene.fish.len(), fish_x.len());
    assert_ne!(scene.fish.x, fish_x);
    assert_ne!(scene.fish.y, fish_y);
    assert_ne!(scene.motes.y, mote_y);
}

#[test]
fn pixel_ratio_is_capped_for_the_backing_store() {
    let (mut r, _h) = renderer(Viewport::new(500.0, 400.0, 3.0));
    r.mount();
    assert_eq!(r.surface().unwrap().backing_size(), (1000, 800));
}

#[test]
fn reduced_motion_freezes_entities_but_keeps_the_clock() {
    let (mut r, h) = renderer(desktop());
    h.motion.set(Some(true));
    r.mount();
    assert!(r.scene().reduced_motion());

    let fish_x = r.scene().fish.x.clone();
    let fish_y = r.scene().fish.y.clone();
    let mote_x = r.scene().motes.x.clone();
    let mote_y = r.scene().motes.y.clone();
    let bubble_y = r.scene().bubbles.y.clone();
    let twinkle = r.scene().glow.twinkle.clone();
    let t0 = r.scene().time();

    for _ in 0..10 {
        r.frame();
    }

    let scene = r.scene();
    assert_eq!(scene.fish.x, fish_x);
    assert_eq!(scene.fish.y, fish_y);
    assert_eq!(scene.motes.x, mote_x);
    assert_eq!(scene.motes.y, mote_y);
    assert_eq!(scene.bubbles.y, bubble_y);
    assert_eq!(scene.glow.twinkle, twinkle);
    assert_eq!(scene.time(), t0 + 2.5);
}

#[test]
fn motion_preference_change_applies_without_regenerating() {
    let (mut r, h) = renderer(desktop());
    h.motion.set(Some(true));
    r.mount();
    let generation = r.scene().generation();
    let fish_x = r.scene().fish.x.clone();

    h.motion.set(Some(false));
    r.motion_preference_changed();
    r.frame();

    assert!(!r.scene().reduced_motion());
    assert_eq!(r.scene().generation(), generation);
    assert_ne!(r.scene().fish.x, fish_x);
}

#[test]
fn unanswerable_motion_query_means_full_motion() {
    let (mut r, h) = renderer(desktop());
    h.motion.set(None);
    r.mount();
    assert!(!r.scene().reduced_motion());
}

#[test]
fn reconfigure_regenerates_with_new_counts() {
    let (mut r, _h) = renderer(Viewport::new(900.0, 700.0, 1.0));
    r.mount();
    let generation = r.scene().generation();

    r.reconfigure(BackgroundConfig {
        particle_count: 10,
        bubble_count: 2,
        fish_count: 9,
        ..BackgroundConfig::default()
    });

    let scene = r.scene();
    assert_eq!(scene.generation(), generation + 1);
    assert_eq!(scene.motes.len(), 10);
    assert_eq!(scene.bubbles.len(), 2);
    assert_eq!(scene.fish.len(), 9);
    assert!(r.is_running());
}

#[cfg(not(target_arch = "wasm32"))]
#[test]
fn raster_surface_draws_something_visible() {
    use river_engine::render::RasterPainter;

    let host = HeadlessHost::headless(Viewport::new(320.0, 240.0, 1.0));
    let mut r = Renderer::new(Some(RasterPainter::new()), host, BackgroundConfig::default(), 5);
    r.mount();
    r.frame();

    let image = r.into_surface().unwrap().into_image();
    assert_eq!(image.dimensions(), (320, 240));
    assert!(image.pixels().any(|p| p[3] > 0));
}
