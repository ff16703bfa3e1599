use glam::Vec3;

/// Packs a normal into one word: three signed bytes (x, y, z) scaled by 127.
///
/// Components are clamped to [-1, 1] and truncated toward zero. Byte 3 is left zero.
#[inline]
pub fn pack_normal(normal: Vec3) -> u32 {
    pack_component(normal.x) | (pack_component(normal.y) << 8) | (pack_component(normal.z) << 16)
}

#[inline]
fn pack_component(v: f32) -> u32 {
    ((v.clamp(-1.0, 1.0) * 127.0) as i32 as u32) & 0xFF
}

/// Decodes component `index` (0 = x, 1 = y, 2 = z) of a packed normal.
#[inline]
pub fn packed_component(packed: u32, index: usize) -> f32 {
    ((packed >> (8 * index)) as u8 as i8) as f32 / 127.0
}

#[inline]
pub fn unpack_normal(packed: u32) -> Vec3 {
    Vec3::new(
        packed_component(packed, 0),
        packed_component(packed, 1),
        packed_component(packed, 2),
    )
}

/// Face normal of a quad from its four corner positions.
///
/// Uses the cross product of the two diagonals, which stays well defined for
/// non-planar and degenerate-edge quads. A zero result is returned as-is.
pub fn face_normal(pos: &[Vec3; 4]) -> Vec3 {
    let d0 = pos[2] - pos[0];
    let d1 = pos[3] - pos[1];
    let n = d0.cross(d1);
    let len = n.length();
    if len != 0.0 { n / len } else { n }
}
