//! Render context configuration.
//!
//! Values are plain data handed to [`ItemRenderContext::new`](crate::render::ItemRenderContext::new).
//! Loading them from disk belongs to the host.

use crate::paint::ColorOrder;

/// Per-context settings that stay fixed across render calls.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ContextConfig {
    /// Byte order the vertex sinks expect for packed colors.
    pub color_order: ColorOrder,
    /// Route every quad to the translucent-cull sink when rendering in GUI mode.
    pub gui_forces_translucent: bool,
    /// Consult the installed [`AoCalculator`](crate::render::AoCalculator), if any.
    pub ambient_occlusion: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            color_order: ColorOrder::native(),
            gui_forces_translucent: true,
            ambient_occlusion: true,
        }
    }
}

impl ContextConfig {
    #[inline]
    pub fn with_color_order(mut self, order: ColorOrder) -> Self {
        self.color_order = order;
        self
    }

    #[inline]
    pub fn with_gui_forces_translucent(mut self, enabled: bool) -> Self {
        self.gui_forces_translucent = enabled;
        self
    }

    #[inline]
    pub fn with_ambient_occlusion(mut self, enabled: bool) -> Self {
        self.ambient_occlusion = enabled;
        self
    }
}
