//! Word layout of an encoded quad.
//!
//! A quad is `TOTAL_STRIDE` consecutive `u32` words: a fixed header followed
//! by four vertex records. Floats are stored as their raw IEEE-754 bits.
//!
//! ```text
//! header  [ bits | color index | tag ]
//! vertex  [ x | y | z | color | u | v | lightmap | normal ] x4
//! ```
//!
//! The vertex record order matches the host's legacy per-vertex layout, so
//! the vertex block can be copied to and from host arrays verbatim.
//!
//! Header bits word:
//! - 0..=2:   cull face (direction id, `CULL_NONE` = no cull face)
//! - 3..=5:   light face (derived)
//! - 6..=9:   normal presence, one bit per vertex
//! - 10..=12: geometry flags (derived)
//! - 13:      shade
//! - 14..:    material

use crate::material::Material;

use super::direction::Direction;

pub const HEADER_BITS: usize = 0;
pub const HEADER_COLOR_INDEX: usize = 1;
pub const HEADER_TAG: usize = 2;
pub const HEADER_STRIDE: usize = 3;

pub const VERTEX_X: usize = 0;
pub const VERTEX_Y: usize = 1;
pub const VERTEX_Z: usize = 2;
pub const VERTEX_COLOR: usize = 3;
pub const VERTEX_U: usize = 4;
pub const VERTEX_V: usize = 5;
pub const VERTEX_LIGHTMAP: usize = 6;
pub const VERTEX_NORMAL: usize = 7;
pub const VERTEX_STRIDE: usize = 8;

/// Words in the four vertex records.
pub const QUAD_STRIDE: usize = VERTEX_STRIDE * 4;
/// Words in one encoded quad, header included.
pub const TOTAL_STRIDE: usize = HEADER_STRIDE + QUAD_STRIDE;

/// Encoded value of "no cull face".
pub const CULL_NONE: u32 = 6;

const DIRECTION_BITS: u32 = 3;
const DIRECTION_MASK: u32 = (1 << DIRECTION_BITS) - 1;

const CULL_SHIFT: u32 = 0;
const CULL_MASK: u32 = DIRECTION_MASK << CULL_SHIFT;

const LIGHT_SHIFT: u32 = CULL_SHIFT + DIRECTION_BITS;
const LIGHT_MASK: u32 = DIRECTION_MASK << LIGHT_SHIFT;

const NORMALS_SHIFT: u32 = LIGHT_SHIFT + DIRECTION_BITS;
const NORMALS_COUNT: u32 = 4;
const NORMALS_MASK: u32 = ((1 << NORMALS_COUNT) - 1) << NORMALS_SHIFT;

const GEOMETRY_SHIFT: u32 = NORMALS_SHIFT + NORMALS_COUNT;
const GEOMETRY_BITS: u32 = 3;
const GEOMETRY_MASK: u32 = ((1 << GEOMETRY_BITS) - 1) << GEOMETRY_SHIFT;

const SHADE_SHIFT: u32 = GEOMETRY_SHIFT + GEOMETRY_BITS;
const SHADE_MASK: u32 = 1 << SHADE_SHIFT;

const MATERIAL_SHIFT: u32 = SHADE_SHIFT + 1;
const MATERIAL_MASK: u32 = ((1 << Material::BIT_LENGTH) - 1) << MATERIAL_SHIFT;

const _: () = assert!(MATERIAL_SHIFT + Material::BIT_LENGTH <= 32);

/// Mask of every header bit except the material.
pub const NON_MATERIAL_MASK: u32 = !MATERIAL_MASK;

#[inline]
pub fn cull_face(bits: u32) -> Option<Direction> {
    Direction::from_id((bits & CULL_MASK) >> CULL_SHIFT)
}

#[inline]
pub fn with_cull_face(bits: u32, face: Option<Direction>) -> u32 {
    let id = face.map_or(CULL_NONE, Direction::id);
    (bits & !CULL_MASK) | (id << CULL_SHIFT)
}

/// Light face as last written to the header. `Up` when never derived.
#[inline]
pub fn light_face(bits: u32) -> Direction {
    Direction::from_id((bits & LIGHT_MASK) >> LIGHT_SHIFT).unwrap_or(Direction::Up)
}

#[inline]
pub fn with_light_face(bits: u32, face: Direction) -> u32 {
    (bits & !LIGHT_MASK) | (face.id() << LIGHT_SHIFT)
}

#[inline]
pub fn normal_flags(bits: u32) -> u32 {
    (bits & NORMALS_MASK) >> NORMALS_SHIFT
}

#[inline]
pub fn with_normal_flags(bits: u32, flags: u32) -> u32 {
    (bits & !NORMALS_MASK) | ((flags << NORMALS_SHIFT) & NORMALS_MASK)
}

#[inline]
pub fn geometry_flags(bits: u32) -> u32 {
    (bits & GEOMETRY_MASK) >> GEOMETRY_SHIFT
}

#[inline]
pub fn with_geometry_flags(bits: u32, flags: u32) -> u32 {
    (bits & !GEOMETRY_MASK) | ((flags << GEOMETRY_SHIFT) & GEOMETRY_MASK)
}

#[inline]
pub fn shade(bits: u32) -> bool {
    bits & SHADE_MASK != 0
}

#[inline]
pub fn with_shade(bits: u32, shade: bool) -> u32 {
    if shade { bits | SHADE_MASK } else { bits & !SHADE_MASK }
}

#[inline]
pub fn material(bits: u32) -> Material {
    Material::from_bits((bits & MATERIAL_MASK) >> MATERIAL_SHIFT)
}

#[inline]
pub fn with_material(bits: u32, material: Material) -> u32 {
    (bits & !MATERIAL_MASK) | ((material.bits() << MATERIAL_SHIFT) & MATERIAL_MASK)
}

/// Header bits of a freshly cleared quad.
#[inline]
pub fn default_header_bits() -> u32 {
    let bits = with_cull_face(0, None);
    let bits = with_shade(bits, true);
    with_material(bits, Material::STANDARD)
}

#[inline]
pub const fn float_to_word(value: f32) -> u32 {
    value.to_bits()
}

#[inline]
pub const fn word_to_float(word: u32) -> f32 {
    f32::from_bits(word)
}

/// Signed values (color index, tag) share the word type via two's complement.
#[inline]
pub const fn int_to_word(value: i32) -> u32 {
    value as u32
}

#[inline]
pub const fn word_to_int(word: u32) -> i32 {
    word as i32
}

/// Index of the first word of vertex `vertex` relative to the quad start.
#[inline]
pub const fn vertex_start(vertex: usize) -> usize {
    HEADER_STRIDE + vertex * VERTEX_STRIDE
}
