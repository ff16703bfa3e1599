//! Quad materials.
//!
//! A [`Material`] is a small packed value stored directly in the quad header.
//! It describes how the single texture layer of a quad is blended, lit and
//! tinted. Multi-layer materials are not supported.

/// How a quad's texture layer is composited.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    /// Whatever the model's ambient layer is.
    #[default]
    Default,
    Solid,
    CutoutMipped,
    Cutout,
    Translucent,
}

impl BlendMode {
    pub const ALL: [BlendMode; 5] = [
        BlendMode::Default,
        BlendMode::Solid,
        BlendMode::CutoutMipped,
        BlendMode::Cutout,
        BlendMode::Translucent,
    ];

    #[inline]
    const fn index(self) -> u32 {
        self as u32
    }

    /// Decodes a blend mode index; out-of-range values fall back to `Default`.
    #[inline]
    fn from_index(index: u32) -> Self {
        Self::ALL.get(index as usize).copied().unwrap_or_default()
    }
}

/// Packed material value.
///
/// Layout (bits):
/// - 0..=2: blend mode
/// - 3: color index disabled
/// - 4: emissive
/// - 5: diffuse shading disabled
/// - 6: ambient occlusion disabled
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Material(u32);

const BLEND_MASK: u32 = 0b111;
const DISABLE_COLOR_INDEX: u32 = 1 << 3;
const EMISSIVE: u32 = 1 << 4;
const DISABLE_DIFFUSE: u32 = 1 << 5;
const DISABLE_AO: u32 = 1 << 6;

impl Material {
    /// Number of bits a material occupies when packed.
    pub const BIT_LENGTH: u32 = 7;

    /// Default blend, tinted through the color index, diffuse + AO lit, not emissive.
    pub const STANDARD: Material = Material(0);

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Rebuilds a material from packed bits. Bits above [`Self::BIT_LENGTH`] are dropped.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Material(bits & ((1 << Self::BIT_LENGTH) - 1))
    }

    #[inline]
    pub fn blend_mode(self) -> BlendMode {
        BlendMode::from_index(self.0 & BLEND_MASK)
    }

    #[inline]
    pub const fn disable_color_index(self) -> bool {
        self.0 & DISABLE_COLOR_INDEX != 0
    }

    #[inline]
    pub const fn emissive(self) -> bool {
        self.0 & EMISSIVE != 0
    }

    #[inline]
    pub const fn disable_diffuse(self) -> bool {
        self.0 & DISABLE_DIFFUSE != 0
    }

    #[inline]
    pub const fn disable_ao(self) -> bool {
        self.0 & DISABLE_AO != 0
    }

    /// Starts a finder pre-loaded with this material's settings.
    #[inline]
    pub fn to_finder(self) -> MaterialFinder {
        MaterialFinder { bits: self.0 }
    }
}

/// Builder for [`Material`] values.
///
/// ```
/// use quadrant_engine::material::{BlendMode, MaterialFinder};
///
/// let glow = MaterialFinder::new()
///     .blend_mode(BlendMode::Translucent)
///     .emissive(true)
///     .find();
/// assert!(glow.emissive());
/// ```
#[derive(Debug, Copy, Clone, Default)]
pub struct MaterialFinder {
    bits: u32,
}

impl MaterialFinder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn blend_mode(mut self, mode: BlendMode) -> Self {
        self.bits = (self.bits & !BLEND_MASK) | mode.index();
        self
    }

    #[inline]
    pub fn disable_color_index(self, disable: bool) -> Self {
        self.flag(DISABLE_COLOR_INDEX, disable)
    }

    #[inline]
    pub fn emissive(self, emissive: bool) -> Self {
        self.flag(EMISSIVE, emissive)
    }

    #[inline]
    pub fn disable_diffuse(self, disable: bool) -> Self {
        self.flag(DISABLE_DIFFUSE, disable)
    }

    #[inline]
    pub fn disable_ao(self, disable: bool) -> Self {
        self.flag(DISABLE_AO, disable)
    }

    #[inline]
    pub fn find(self) -> Material {
        Material(self.bits)
    }

    #[inline]
    fn flag(mut self, mask: u32, on: bool) -> Self {
        if on {
            self.bits |= mask;
        } else {
            self.bits &= !mask;
        }
        self
    }
}
