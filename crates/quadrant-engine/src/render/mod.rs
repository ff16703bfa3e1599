//! Item quad rendering.
//!
//! [`ItemRenderContext`] takes quads from a model (direct emission, mesh
//! replay or a legacy fallback), runs each through quad transforms, tint and
//! lighting, and writes four vertices per quad into a [`VertexSink`] chosen
//! by the quad's blend mode.
//!
//! Convention:
//! - models are authored in block space (`0..1` on every axis)
//! - sink colors are packed in the context's configured channel order

mod ctx;
mod model;
pub mod pose;
mod sink;

pub use ctx::{
    buffer_quad, ContextEmitter, ItemRenderContext, QuadOutput, QuadTransform, RenderRequest,
    RenderStats,
};
pub use model::{
    AoCalculator, ColorPalette, ItemStack, LegacyModel, LegacyQuadHandler, QuadModel,
    ITEM_RANDOM_SEED,
};
pub use pose::{ModelTransformation, Pose, PoseStack, TransformMode, Transformation};
pub use sink::{
    BufferedSinks, SinkId, SinkLayer, SinkProvider, SinkVertex, VertexBuffer, VertexSink,
};
