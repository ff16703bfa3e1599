use std::cell::Cell;

use glam::{Vec2, Vec3};

use crate::material::Material;

use super::direction::Direction;
use super::encoding::{self as enc, TOTAL_STRIDE};
use super::geometry::Geometry;
use super::normal::{packed_component, unpack_normal};

/// Cached derivation state of a quad view.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) enum GeometryState {
    /// Positions or cull face changed since the last derivation.
    Stale,
    Fresh(Geometry),
}

/// Decoder over one encoded quad.
///
/// `S` is the backing storage. Any `S: AsRef<[u32]>` gives the read path;
/// `S: AsMut<[u32]>` additionally unlocks the setters in `mesh::mutable`.
/// Access mode is therefore fixed by the storage type at compile time and
/// nothing in the per-quad path dispatches dynamically.
///
/// Derived geometry (face normal, light face, shape flags) is computed on
/// first read and cached until a position, normal or cull face changes.
/// The cache lives in a `Cell`, so views are `!Sync`: a view belongs to the
/// thread that renders with it.
#[derive(Debug, Clone)]
pub struct QuadView<S> {
    pub(crate) data: S,
    pub(crate) base: usize,
    pub(crate) nominal_face: Option<Direction>,
    pub(crate) geometry: Cell<GeometryState>,
}

/// Read-only view borrowed from a mesh or any word slice.
pub type QuadRef<'a> = QuadView<&'a [u32]>;

/// Self-contained writable quad; the editor quad of emitters and render contexts.
pub type MutableQuad = QuadView<[u32; TOTAL_STRIDE]>;

impl<'a> QuadRef<'a> {
    /// Attaches to the quad starting at `base` and derives its geometry.
    ///
    /// # Panics
    /// Panics if `data` does not hold a whole quad at `base`.
    pub fn load(data: &'a [u32], base: usize) -> Self {
        let mut view = QuadView {
            data,
            base,
            nominal_face: None,
            geometry: Cell::new(GeometryState::Stale),
        };
        view.reload();
        view
    }
}

impl MutableQuad {
    /// A cleared quad with its own storage.
    pub fn new() -> Self {
        let mut quad = QuadView {
            data: [0; TOTAL_STRIDE],
            base: 0,
            nominal_face: None,
            geometry: Cell::new(GeometryState::Stale),
        };
        quad.clear();
        quad
    }
}

impl Default for MutableQuad {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: AsRef<[u32]>> QuadView<S> {
    #[inline]
    fn word(&self, offset: usize) -> u32 {
        self.data.as_ref()[self.base + offset]
    }

    #[inline]
    pub(crate) fn header_bits(&self) -> u32 {
        self.word(enc::HEADER_BITS)
    }

    #[inline]
    fn vertex_word(&self, vertex: usize, field: usize) -> u32 {
        assert!(vertex < 4, "vertex index out of range: {vertex}");
        self.word(enc::vertex_start(vertex) + field)
    }

    /// Decodes derived state from already-attached storage.
    ///
    /// The stale mark is dropped, geometry is derived from the encoded
    /// positions, and the nominal face is pinned to the resulting light face.
    /// The nominal face is not re-derived afterwards.
    pub fn reload(&mut self) {
        assert!(
            self.base + TOTAL_STRIDE <= self.data.as_ref().len(),
            "quad at word {} overruns storage of {} words",
            self.base,
            self.data.as_ref().len()
        );
        self.geometry.set(GeometryState::Stale);
        self.nominal_face = Some(self.light_face());
    }

    /// The bound region of the backing storage.
    ///
    /// The header's light-face and shape-flag bits are those last written by
    /// `compute_geometry` (run on every emit) or [`copy_to`](Self::copy_to).
    /// A derived read after a position change refreshes the cache only, so
    /// call `compute_geometry` before exporting an edited quad's words.
    #[inline]
    pub fn words(&self) -> &[u32] {
        &self.data.as_ref()[self.base..self.base + TOTAL_STRIDE]
    }

    /// Derived geometry, computing it first when stale. The header is not updated.
    pub fn geometry(&self) -> Geometry {
        match self.geometry.get() {
            GeometryState::Fresh(g) => g,
            GeometryState::Stale => {
                let g = Geometry::derive(&self.positions());
                self.geometry.set(GeometryState::Fresh(g));
                g
            }
        }
    }

    /// True until the next derived read recomputes geometry.
    #[inline]
    pub fn is_geometry_stale(&self) -> bool {
        self.geometry.get() == GeometryState::Stale
    }

    // ── header ────────────────────────────────────────────────────────────

    #[inline]
    pub fn material(&self) -> Material {
        enc::material(self.header_bits())
    }

    /// Palette index, or `-1` for "no tint".
    #[inline]
    pub fn color_index(&self) -> i32 {
        enc::word_to_int(self.word(enc::HEADER_COLOR_INDEX))
    }

    /// Opaque user payload.
    #[inline]
    pub fn tag(&self) -> i32 {
        enc::word_to_int(self.word(enc::HEADER_TAG))
    }

    #[inline]
    pub fn cull_face(&self) -> Option<Direction> {
        enc::cull_face(self.header_bits())
    }

    /// Face the quad was authored for. Fixed at load; not re-derived.
    #[inline]
    pub fn nominal_face(&self) -> Option<Direction> {
        self.nominal_face
    }

    #[inline]
    pub fn light_face(&self) -> Direction {
        self.geometry().light_face
    }

    /// Shape flags (see `mesh::geometry`) for lighting code.
    #[inline]
    pub fn geometry_flags(&self) -> u32 {
        self.geometry().flags
    }

    #[inline]
    pub fn face_normal(&self) -> Vec3 {
        self.geometry().face_normal
    }

    /// Bit `i` set when vertex `i` carries an explicit normal.
    #[inline]
    pub fn normal_flags(&self) -> u32 {
        enc::normal_flags(self.header_bits())
    }

    #[inline]
    pub fn has_vertex_normals(&self) -> bool {
        self.normal_flags() != 0
    }

    /// Diffuse shading requested by the quad and allowed by its material.
    #[inline]
    pub fn has_shade(&self) -> bool {
        enc::shade(self.header_bits()) && !self.material().disable_diffuse()
    }

    // ── vertices ──────────────────────────────────────────────────────────

    #[inline]
    pub fn x(&self, vertex: usize) -> f32 {
        enc::word_to_float(self.vertex_word(vertex, enc::VERTEX_X))
    }

    #[inline]
    pub fn y(&self, vertex: usize) -> f32 {
        enc::word_to_float(self.vertex_word(vertex, enc::VERTEX_Y))
    }

    #[inline]
    pub fn z(&self, vertex: usize) -> f32 {
        enc::word_to_float(self.vertex_word(vertex, enc::VERTEX_Z))
    }

    /// Position component `coord` (0 = x, 1 = y, 2 = z).
    #[inline]
    pub fn pos_by_index(&self, vertex: usize, coord: usize) -> f32 {
        assert!(coord < 3, "coordinate index out of range: {coord}");
        enc::word_to_float(self.vertex_word(vertex, enc::VERTEX_X + coord))
    }

    #[inline]
    pub fn pos(&self, vertex: usize) -> Vec3 {
        Vec3::new(self.x(vertex), self.y(vertex), self.z(vertex))
    }

    #[inline]
    pub fn positions(&self) -> [Vec3; 4] {
        [self.pos(0), self.pos(1), self.pos(2), self.pos(3)]
    }

    #[inline]
    pub fn has_normal(&self, vertex: usize) -> bool {
        assert!(vertex < 4, "vertex index out of range: {vertex}");
        self.normal_flags() & (1 << vertex) != 0
    }

    /// Explicit vertex normal, if one was set.
    #[inline]
    pub fn normal(&self, vertex: usize) -> Option<Vec3> {
        self.has_normal(vertex)
            .then(|| unpack_normal(self.vertex_word(vertex, enc::VERTEX_NORMAL)))
    }

    /// Normal x component; NaN when the vertex has no explicit normal.
    #[inline]
    pub fn normal_x(&self, vertex: usize) -> f32 {
        self.normal_component(vertex, 0)
    }

    #[inline]
    pub fn normal_y(&self, vertex: usize) -> f32 {
        self.normal_component(vertex, 1)
    }

    #[inline]
    pub fn normal_z(&self, vertex: usize) -> f32 {
        self.normal_component(vertex, 2)
    }

    #[inline]
    fn normal_component(&self, vertex: usize, index: usize) -> f32 {
        if self.has_normal(vertex) {
            packed_component(self.vertex_word(vertex, enc::VERTEX_NORMAL), index)
        } else {
            f32::NAN
        }
    }

    #[inline]
    pub fn lightmap(&self, vertex: usize) -> u32 {
        self.vertex_word(vertex, enc::VERTEX_LIGHTMAP)
    }

    /// ARGB vertex color of texture layer `sprite`.
    ///
    /// # Panics
    /// Only layer 0 exists; any other `sprite` panics.
    #[inline]
    pub fn sprite_color(&self, vertex: usize, sprite: usize) -> u32 {
        check_sprite(sprite);
        self.vertex_word(vertex, enc::VERTEX_COLOR)
    }

    #[inline]
    pub fn sprite_u(&self, vertex: usize, sprite: usize) -> f32 {
        check_sprite(sprite);
        enc::word_to_float(self.vertex_word(vertex, enc::VERTEX_U))
    }

    #[inline]
    pub fn sprite_v(&self, vertex: usize, sprite: usize) -> f32 {
        check_sprite(sprite);
        enc::word_to_float(self.vertex_word(vertex, enc::VERTEX_V))
    }

    #[inline]
    pub fn sprite_uv(&self, vertex: usize, sprite: usize) -> Vec2 {
        Vec2::new(self.sprite_u(vertex, sprite), self.sprite_v(vertex, sprite))
    }

    // ── copying out ───────────────────────────────────────────────────────

    /// Copies this quad into `target`, leaving the target's material alone.
    ///
    /// Geometry is derived first, so the target receives a consistent header,
    /// face normal and nominal face and starts fresh.
    pub fn copy_to<T>(&self, target: &mut QuadView<T>)
    where
        T: AsRef<[u32]> + AsMut<[u32]>,
    {
        let geometry = self.geometry();
        let mut words = [0u32; TOTAL_STRIDE];
        words.copy_from_slice(self.words());
        words[enc::HEADER_BITS] = enc::with_geometry_flags(
            enc::with_light_face(words[enc::HEADER_BITS], geometry.light_face),
            geometry.flags,
        );

        let base = target.base;
        let dst = &mut target.data.as_mut()[base..base + TOTAL_STRIDE];
        let kept_material = dst[enc::HEADER_BITS] & !enc::NON_MATERIAL_MASK;
        dst.copy_from_slice(&words);
        dst[enc::HEADER_BITS] = (dst[enc::HEADER_BITS] & enc::NON_MATERIAL_MASK) | kept_material;

        target.nominal_face = self.nominal_face;
        target.geometry.set(GeometryState::Fresh(geometry));
    }

    /// Writes the four vertex records into a host legacy vertex array at `index`.
    ///
    /// The record layout is shared with the host, so this is a straight copy.
    pub fn to_legacy(&self, target: &mut [u32], index: usize) {
        let start = self.base + enc::HEADER_STRIDE;
        target[index..index + enc::QUAD_STRIDE]
            .copy_from_slice(&self.data.as_ref()[start..start + enc::QUAD_STRIDE]);
    }

    /// The vertex block in host legacy layout, one `VERTEX_STRIDE` record per vertex.
    pub fn legacy_vertex_data(&self) -> [u32; enc::QUAD_STRIDE] {
        let mut out = [0u32; enc::QUAD_STRIDE];
        self.to_legacy(&mut out, 0);
        out
    }
}

#[inline]
fn check_sprite(sprite: usize) {
    assert!(sprite == 0, "unsupported sprite index: {sprite}");
}
