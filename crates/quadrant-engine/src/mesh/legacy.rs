use super::direction::Direction;
use super::encoding::{self as enc, QUAD_STRIDE};

/// A quad in the host's legacy representation.
///
/// `vertex_data` holds four `VERTEX_STRIDE` records in the same per-vertex
/// order as the quad encoding. The normal word of each record is ignored when
/// converting; normals are derived from positions instead.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyQuad {
    pub vertex_data: [u32; QUAD_STRIDE],
    /// Face the quad was baked for.
    pub face: Direction,
    pub color_index: i32,
    pub shade: bool,
}

impl LegacyQuad {
    /// Builds a legacy quad from positions, UVs and a shared color.
    ///
    /// Lightmaps start at zero.
    pub fn new(face: Direction, positions: [[f32; 3]; 4], uvs: [[f32; 2]; 4], color: u32) -> Self {
        let mut vertex_data = [0u32; QUAD_STRIDE];
        for (i, (p, uv)) in positions.iter().zip(uvs.iter()).enumerate() {
            let v = i * enc::VERTEX_STRIDE;
            vertex_data[v + enc::VERTEX_X] = enc::float_to_word(p[0]);
            vertex_data[v + enc::VERTEX_Y] = enc::float_to_word(p[1]);
            vertex_data[v + enc::VERTEX_Z] = enc::float_to_word(p[2]);
            vertex_data[v + enc::VERTEX_COLOR] = color;
            vertex_data[v + enc::VERTEX_U] = enc::float_to_word(uv[0]);
            vertex_data[v + enc::VERTEX_V] = enc::float_to_word(uv[1]);
        }
        Self {
            vertex_data,
            face,
            color_index: -1,
            shade: true,
        }
    }

    #[inline]
    pub fn with_color_index(mut self, index: i32) -> Self {
        self.color_index = index;
        self
    }
}
