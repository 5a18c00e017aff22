// ============================================================================
// RIVER BACKDROP - Ambient fishing/camping scene painted behind the site
// ============================================================================
//
// Motes and glow dots in the air, two fishing rods with bobbers, a calm river
// band with wave lines, fish crossing it and bubbles rising out of it, all on
// one canvas fixed behind the page content. Decorative only: nothing here is
// allowed to fail loudly.

pub mod config;
pub mod error;
pub mod host;
pub mod render;
pub mod sim;
pub mod web;
pub mod world;

pub use config::BackgroundConfig;
pub use error::{BackdropError, BackdropResult};
pub use host::{
    FrameRequest, FrameScheduler, Host, Lifecycle, MotionPreferenceObserver, Renderer, Surface,
    ViewportObserver,
};
pub use render::{Layer, Paint, Painter, RecordingPainter, Rgba, StrokeStyle};
pub use sim::Scene;
pub use web::FishingBackground;
pub use world::Viewport;
