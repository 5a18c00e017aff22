// world/ - Viewport queries
//
// Pure functions over the measured viewport: breakpoints, river band
// placement, population sizing and the water surface curve.
// No state, no allocation - just math.

mod layout;
mod river;
mod viewport;

pub use layout::*;
pub use river::*;
pub use viewport::*;
