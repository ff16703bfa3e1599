//! Color and light values carried by quad vertices.
//!
//! Scope:
//! - packed ARGB colors and the tint multiply
//! - sink channel order
//! - packed block/sky lightmaps
//!
//! Everything here is integer math on packed words; no float colors.

pub mod color;
pub mod light;

pub use color::{multiply_color, scale_rgb, swap_red_blue, ColorOrder, OPAQUE, WHITE};
pub use light::{max_brightness, pack_lightmap, FULL_BRIGHTNESS};
