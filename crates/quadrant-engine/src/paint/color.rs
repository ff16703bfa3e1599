//! Packed 8-bit-per-channel colors as stored in quad vertex records.
//!
//! Encoding:
//! - ARGB, alpha in the top byte, blue in the low byte.
//! - `WHITE` (all bits set, `-1` as `i32`) doubles as "no tint".

/// Opaque white; also the identity for [`multiply_color`].
pub const WHITE: u32 = 0xFFFF_FFFF;

/// Alpha mask. OR-ing it in forces a color opaque.
pub const OPAQUE: u32 = 0xFF00_0000;

/// Byte order a vertex sink expects for packed colors.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ColorOrder {
    /// Same as the quad encoding.
    Argb,
    /// Red and blue swapped; what a little-endian RGBA byte buffer reads as.
    Abgr,
}

impl ColorOrder {
    /// Order matching an RGBA byte buffer on the current target.
    #[inline]
    pub const fn native() -> Self {
        if cfg!(target_endian = "little") {
            ColorOrder::Abgr
        } else {
            ColorOrder::Argb
        }
    }

    /// Converts an ARGB color into this order.
    #[inline]
    pub const fn convert(self, color: u32) -> u32 {
        match self {
            ColorOrder::Argb => color,
            ColorOrder::Abgr => swap_red_blue(color),
        }
    }
}

/// Builds an ARGB color from straight 8-bit channels.
#[inline]
pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Splits an ARGB color into `[a, r, g, b]`.
#[inline]
pub const fn channels(color: u32) -> [u8; 4] {
    [(color >> 24) as u8, (color >> 16) as u8, (color >> 8) as u8, color as u8]
}

/// Multiplies two ARGB colors channel by channel (`x * y / 255`, alpha included).
///
/// `WHITE` on either side returns the other operand untouched.
#[inline]
pub fn multiply_color(lhs: u32, rhs: u32) -> u32 {
    if lhs == WHITE {
        return rhs;
    }
    if rhs == WHITE {
        return lhs;
    }

    let [la, lr, lg, lb] = channels(lhs);
    let [ra, rr, rg, rb] = channels(rhs);
    argb(mul8(la, ra), mul8(lr, rr), mul8(lg, rg), mul8(lb, rb))
}

#[inline]
fn mul8(a: u8, b: u8) -> u8 {
    // Max product is 255 * 255, so the quotient always fits a byte.
    (a as u32 * b as u32 / 255) as u8
}

/// Scales the RGB channels of `color` by `factor` (clamped to [0, 1]); alpha unchanged.
#[inline]
pub fn scale_rgb(color: u32, factor: f32) -> u32 {
    let f = factor.clamp(0.0, 1.0);
    let [a, r, g, b] = channels(color);
    let s = |c: u8| (c as f32 * f) as u8;
    argb(a, s(r), s(g), s(b))
}

/// Swaps the red and blue channels (ARGB <-> ABGR).
#[inline]
pub const fn swap_red_blue(color: u32) -> u32 {
    (color & 0xFF00_FF00) | ((color & 0x00FF_0000) >> 16) | ((color & 0x0000_00FF) << 16)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── multiply_color ────────────────────────────────────────────────────

    #[test]
    fn white_is_identity_on_both_sides() {
        let c = argb(128, 10, 20, 30);
        assert_eq!(multiply_color(WHITE, c), c);
        assert_eq!(multiply_color(c, WHITE), c);
    }

    #[test]
    fn opaque_red_tint_keeps_sprite_alpha() {
        let tint = argb(0, 255, 0, 0) | OPAQUE;
        let sprite = argb(128, 128, 128, 128);
        assert_eq!(multiply_color(tint, sprite), argb(128, 128, 0, 0));
        assert_eq!(multiply_color(tint, sprite), 0x8080_0000);
    }

    #[test]
    fn multiply_truncates() {
        // 200 * 100 / 255 = 78.43
        let c = multiply_color(argb(255, 200, 200, 200), argb(255, 100, 100, 100));
        assert_eq!(channels(c), [255, 78, 78, 78]);
    }

    #[test]
    fn multiply_by_black_zeroes_rgb() {
        let c = multiply_color(argb(255, 0, 0, 0), argb(200, 90, 90, 90));
        assert_eq!(channels(c), [200, 0, 0, 0]);
    }

    // ── channel order ─────────────────────────────────────────────────────

    #[test]
    fn swap_red_blue_is_an_involution() {
        let c = argb(1, 2, 3, 4);
        assert_eq!(swap_red_blue(c), argb(1, 4, 3, 2));
        assert_eq!(swap_red_blue(swap_red_blue(c)), c);
    }

    #[test]
    fn argb_order_is_passthrough() {
        assert_eq!(ColorOrder::Argb.convert(0x1122_3344), 0x1122_3344);
        assert_eq!(ColorOrder::Abgr.convert(0x1122_3344), 0x1144_3322);
    }

    #[test]
    fn scale_rgb_leaves_alpha() {
        let c = scale_rgb(argb(77, 200, 100, 50), 0.5);
        assert_eq!(channels(c), [77, 100, 50, 25]);
    }
}
