//! Interfaces between the render context and the host.

use crate::mesh::{Direction, LegacyQuad, MutableQuad};

use super::ctx::QuadOutput;
use super::pose::{ModelTransformation, Pose};
use super::sink::VertexSink;

/// Seed handed to legacy models when picking quad variants.
pub const ITEM_RANDOM_SEED: u64 = 42;

/// The item being rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemStack {
    pub item: u32,
    /// Enchantment glint.
    pub glint: bool,
}

impl ItemStack {
    pub fn new(item: u32) -> Self {
        Self { item, glint: false }
    }

    pub fn with_glint(mut self, glint: bool) -> Self {
        self.glint = glint;
        self
    }
}

/// Per-item tint lookup. Only consulted for color indices other than `-1`.
pub trait ColorPalette {
    /// RGB tint for `index`; the alpha byte is ignored.
    fn color(&self, stack: &ItemStack, index: i32) -> u32;
}

impl<F> ColorPalette for F
where
    F: Fn(&ItemStack, i32) -> u32,
{
    fn color(&self, stack: &ItemStack, index: i32) -> u32 {
        self(stack, index)
    }
}

/// A model that produces quads through a [`QuadOutput`].
pub trait QuadModel {
    fn emit_item_quads(&self, stack: &ItemStack, out: &mut QuadOutput<'_>);

    fn transformation(&self) -> &ModelTransformation {
        &ModelTransformation::NONE
    }
}

/// A model in the host's legacy representation.
pub trait LegacyModel {
    /// Quads with the given cull face (`None` for unculled quads).
    fn quads(&self, cull_face: Option<Direction>, seed: u64) -> &[LegacyQuad];
}

/// Host rendering path for legacy models when no quad transform is active.
pub trait LegacyQuadHandler {
    fn render(
        &mut self,
        model: &dyn LegacyModel,
        stack: &ItemStack,
        lightmap: u32,
        overlay: u32,
        pose: &Pose,
        sink: &mut dyn VertexSink,
    );
}

/// Per-vertex ambient occlusion.
///
/// Implementations read the quad's light face and geometry flags to choose
/// their sampling; the result scales the RGB of each vertex color.
pub trait AoCalculator {
    fn compute(&mut self, quad: &MutableQuad) -> [f32; 4];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_is_item_and_glint() {
        let plain = ItemStack::new(7);
        assert_eq!(plain, ItemStack { item: 7, glint: false });
        assert_eq!(plain.clone().with_glint(true), ItemStack { item: 7, glint: true });
        assert_eq!(ItemStack::default(), ItemStack { item: 0, glint: false });
    }
}
