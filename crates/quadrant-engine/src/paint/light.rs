//! Packed lightmap values.
//!
//! Layout: block light in the low 16 bits, sky light in the high 16 bits.
//! Each channel holds `level << 4` for levels 0..=15.

/// Maximum block and sky light. Emissive quads always use this.
pub const FULL_BRIGHTNESS: u32 = pack_lightmap(15, 15);

/// Packs block and sky levels (0..=15) into one lightmap word.
#[inline]
pub const fn pack_lightmap(block: u8, sky: u8) -> u32 {
    (((block & 0xF) as u32) << 4) | (((sky & 0xF) as u32) << 20)
}

/// Block light level (0..=15).
#[inline]
pub const fn block_light(lightmap: u32) -> u8 {
    ((lightmap >> 4) & 0xF) as u8
}

/// Sky light level (0..=15).
#[inline]
pub const fn sky_light(lightmap: u32) -> u8 {
    ((lightmap >> 20) & 0xF) as u8
}

/// Componentwise maximum of two lightmaps. Zero on either side is the identity.
#[inline]
pub fn max_brightness(a: u32, b: u32) -> u32 {
    if a == 0 {
        return b;
    }
    if b == 0 {
        return a;
    }
    (a & 0xFFFF).max(b & 0xFFFF) | (a & 0xFFFF_0000).max(b & 0xFFFF_0000)
}
