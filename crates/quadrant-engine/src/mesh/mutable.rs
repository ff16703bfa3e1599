use std::ops::DerefMut;

use glam::{Vec2, Vec3};

use crate::material::Material;

use super::direction::Direction;
use super::encoding::{self as enc, TOTAL_STRIDE};
use super::legacy::LegacyQuad;
use super::normal::pack_normal;
use super::view::{GeometryState, MutableQuad, QuadView};

/// Depth below which [`QuadView::square`] treats a face as lying on the block boundary.
const CULL_FACE_EPSILON: f32 = 0.00001;

/// Write path. Available when the storage is mutable.
///
/// Every setter that can move the quad (positions, normals, cull face) marks
/// derived geometry stale.
impl<S: AsRef<[u32]> + AsMut<[u32]>> QuadView<S> {
    #[inline]
    fn word_mut(&mut self, offset: usize) -> &mut u32 {
        let base = self.base;
        &mut self.data.as_mut()[base + offset]
    }

    #[inline]
    fn vertex_word_mut(&mut self, vertex: usize, field: usize) -> &mut u32 {
        assert!(vertex < 4, "vertex index out of range: {vertex}");
        self.word_mut(enc::vertex_start(vertex) + field)
    }

    #[inline]
    fn update_header(&mut self, f: impl FnOnce(u32) -> u32) {
        let w = self.word_mut(enc::HEADER_BITS);
        *w = f(*w);
    }

    #[inline]
    fn invalidate(&mut self) {
        self.geometry.set(GeometryState::Stale);
    }

    /// Resets the bound region to an empty, untinted, standard-material quad.
    pub fn clear(&mut self) -> &mut Self {
        let base = self.base;
        let region = &mut self.data.as_mut()[base..base + TOTAL_STRIDE];
        region.fill(0);
        region[enc::HEADER_BITS] = enc::default_header_bits();
        region[enc::HEADER_COLOR_INDEX] = enc::int_to_word(-1);
        self.nominal_face = None;
        self.invalidate();
        self
    }

    /// Derives geometry if stale and writes light face and shape flags into the header.
    pub fn compute_geometry(&mut self) -> &mut Self {
        let g = self.geometry();
        self.update_header(|bits| {
            enc::with_geometry_flags(enc::with_light_face(bits, g.light_face), g.flags)
        });
        self
    }

    // ── header ────────────────────────────────────────────────────────────

    #[inline]
    pub fn set_material(&mut self, material: Material) -> &mut Self {
        self.update_header(|bits| enc::with_material(bits, material));
        self
    }

    /// Palette index for tinting; `-1` disables tinting.
    #[inline]
    pub fn set_color_index(&mut self, index: i32) -> &mut Self {
        *self.word_mut(enc::HEADER_COLOR_INDEX) = enc::int_to_word(index);
        self
    }

    #[inline]
    pub fn set_tag(&mut self, tag: i32) -> &mut Self {
        *self.word_mut(enc::HEADER_TAG) = enc::int_to_word(tag);
        self
    }

    /// Sets the cull face. The nominal face follows it.
    #[inline]
    pub fn set_cull_face(&mut self, face: Option<Direction>) -> &mut Self {
        self.update_header(|bits| enc::with_cull_face(bits, face));
        self.nominal_face = face;
        self.invalidate();
        self
    }

    #[inline]
    pub fn set_nominal_face(&mut self, face: Option<Direction>) -> &mut Self {
        self.nominal_face = face;
        self
    }

    #[inline]
    pub fn set_shade(&mut self, shade: bool) -> &mut Self {
        self.update_header(|bits| enc::with_shade(bits, shade));
        self
    }

    // ── vertices ──────────────────────────────────────────────────────────

    #[inline]
    pub fn set_pos(&mut self, vertex: usize, pos: Vec3) -> &mut Self {
        *self.vertex_word_mut(vertex, enc::VERTEX_X) = enc::float_to_word(pos.x);
        *self.vertex_word_mut(vertex, enc::VERTEX_Y) = enc::float_to_word(pos.y);
        *self.vertex_word_mut(vertex, enc::VERTEX_Z) = enc::float_to_word(pos.z);
        self.invalidate();
        self
    }

    /// Sets an explicit vertex normal (quantized, see `mesh::normal`).
    #[inline]
    pub fn set_normal(&mut self, vertex: usize, normal: Vec3) -> &mut Self {
        *self.vertex_word_mut(vertex, enc::VERTEX_NORMAL) = pack_normal(normal);
        let flags = self.normal_flags() | (1 << vertex);
        self.update_header(|bits| enc::with_normal_flags(bits, flags));
        self.invalidate();
        self
    }

    #[inline]
    pub fn set_lightmap(&mut self, vertex: usize, lightmap: u32) -> &mut Self {
        *self.vertex_word_mut(vertex, enc::VERTEX_LIGHTMAP) = lightmap;
        self
    }

    /// Sets the ARGB color of texture layer `sprite`.
    ///
    /// # Panics
    /// Only layer 0 exists; any other `sprite` panics.
    #[inline]
    pub fn set_sprite_color(&mut self, vertex: usize, sprite: usize, color: u32) -> &mut Self {
        assert!(sprite == 0, "unsupported sprite index: {sprite}");
        *self.vertex_word_mut(vertex, enc::VERTEX_COLOR) = color;
        self
    }

    #[inline]
    pub fn set_sprite_uv(&mut self, vertex: usize, sprite: usize, uv: Vec2) -> &mut Self {
        assert!(sprite == 0, "unsupported sprite index: {sprite}");
        *self.vertex_word_mut(vertex, enc::VERTEX_U) = enc::float_to_word(uv.x);
        *self.vertex_word_mut(vertex, enc::VERTEX_V) = enc::float_to_word(uv.y);
        self
    }

    /// Same color on all four vertices.
    pub fn set_color_all(&mut self, sprite: usize, color: u32) -> &mut Self {
        for v in 0..4 {
            self.set_sprite_color(v, sprite, color);
        }
        self
    }

    pub fn set_lightmap_all(&mut self, lightmap: u32) -> &mut Self {
        for v in 0..4 {
            self.set_lightmap(v, lightmap);
        }
        self
    }

    /// Fills any vertex without an explicit normal with the face normal.
    pub fn populate_missing_normals(&mut self) -> &mut Self {
        let missing = !self.normal_flags() & 0b1111;
        if missing == 0 {
            return self;
        }

        let packed = pack_normal(self.face_normal());
        for v in 0..4 {
            if missing & (1 << v) != 0 {
                *self.vertex_word_mut(v, enc::VERTEX_NORMAL) = packed;
            }
        }
        self.update_header(|bits| enc::with_normal_flags(bits, 0b1111));
        self
    }

    /// Sets positions for an axis-aligned rectangle on `nominal_face`.
    ///
    /// Coordinates are in the face's own 2D frame (`left`..`right`,
    /// `bottom`..`top`) at `depth` inward from the block boundary. A depth of
    /// zero also makes `nominal_face` the cull face.
    pub fn square(
        &mut self,
        nominal_face: Direction,
        left: f32,
        bottom: f32,
        right: f32,
        top: f32,
        depth: f32,
    ) -> &mut Self {
        let depth = if depth.abs() < CULL_FACE_EPSILON {
            self.set_cull_face(Some(nominal_face));
            0.0
        } else {
            self.set_cull_face(None);
            depth
        };
        self.set_nominal_face(Some(nominal_face));

        let corners = match nominal_face {
            Direction::Up => {
                let (d, t, b) = (1.0 - depth, 1.0 - top, 1.0 - bottom);
                [[left, d, t], [left, d, b], [right, d, b], [right, d, t]]
            }
            Direction::Down => [
                [left, depth, top],
                [left, depth, bottom],
                [right, depth, bottom],
                [right, depth, top],
            ],
            Direction::East => {
                let (d, l, r) = (1.0 - depth, 1.0 - left, 1.0 - right);
                [[d, top, l], [d, bottom, l], [d, bottom, r], [d, top, r]]
            }
            Direction::West => [
                [depth, top, left],
                [depth, bottom, left],
                [depth, bottom, right],
                [depth, top, right],
            ],
            Direction::South => {
                let (d, l, r) = (1.0 - depth, 1.0 - left, 1.0 - right);
                [[1.0 - l, top, d], [1.0 - l, bottom, d], [1.0 - r, bottom, d], [1.0 - r, top, d]]
            }
            Direction::North => [
                [1.0 - left, top, depth],
                [1.0 - left, bottom, depth],
                [1.0 - right, bottom, depth],
                [1.0 - right, top, depth],
            ],
        };

        for (v, c) in corners.into_iter().enumerate() {
            self.set_pos(v, Vec3::from_array(c));
        }
        self
    }

    /// Replaces this quad with a host legacy quad.
    ///
    /// The vertex block is copied verbatim; normal flags are cleared so
    /// normals come from the derived face normal. `material` and `cull_face`
    /// are assigned by the caller, and geometry is left stale.
    pub fn load_legacy(
        &mut self,
        quad: &LegacyQuad,
        material: Material,
        cull_face: Option<Direction>,
    ) -> &mut Self {
        let base = self.base;
        let region = &mut self.data.as_mut()[base..base + TOTAL_STRIDE];
        region[enc::HEADER_STRIDE..].copy_from_slice(&quad.vertex_data);

        let bits = enc::with_cull_face(enc::default_header_bits(), cull_face);
        let bits = enc::with_shade(bits, quad.shade);
        region[enc::HEADER_BITS] = enc::with_material(bits, material);
        region[enc::HEADER_COLOR_INDEX] = enc::int_to_word(quad.color_index);
        region[enc::HEADER_TAG] = 0;

        self.nominal_face = Some(quad.face);
        self.invalidate();
        self
    }
}

/// The "clear → fill → emit" capability handed to model code.
///
/// Implementors deref to their editor quad; `emit` hands the finished quad
/// to whatever consumes it and leaves the editor cleared for the next one.
pub trait QuadEmitter: DerefMut<Target = MutableQuad> {
    fn emit(&mut self) -> &mut Self;
}
