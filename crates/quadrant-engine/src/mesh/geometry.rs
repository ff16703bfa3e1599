//! Derived quad geometry: face normal, light face and shape flags.
//!
//! Derivation is a pure function of the four vertex positions. Lighting code
//! outside this crate reads the flags to pick its interpolation strategy.

use glam::Vec3;

use super::direction::{Axis, Direction};
use super::normal::face_normal;

/// The quad covers the full unit square on the two axes perpendicular to the light face.
pub const CUBIC_FLAG: u32 = 1;
/// All four vertices share the light-face axis coordinate.
pub const AXIS_ALIGNED_FLAG: u32 = 2;
/// The quad is axis aligned and lies on the block boundary of its light face.
pub const LIGHT_FACE_FLAG: u32 = 4;

const EPS_MIN: f32 = 0.0001;
const EPS_MAX: f32 = 1.0 - EPS_MIN;
const PLANE_EPSILON: f32 = 1.0e-5;

/// Result of one geometry derivation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Geometry {
    pub light_face: Direction,
    pub flags: u32,
    pub face_normal: Vec3,
}

impl Geometry {
    pub fn derive(pos: &[Vec3; 4]) -> Self {
        let face_normal = face_normal(pos);
        let light_face = light_face(face_normal);
        let flags = shape_flags(light_face, pos);
        Self { light_face, flags, face_normal }
    }
}

/// Axis with the largest absolute component. Ties go to Y, then X.
pub fn longest_axis(v: Vec3) -> Axis {
    let mut result = Axis::Y;
    let mut longest = v.y.abs();

    let x = v.x.abs();
    if x > longest {
        result = Axis::X;
        longest = x;
    }

    if v.z.abs() > longest { Axis::Z } else { result }
}

/// Direction the quad faces for lighting purposes.
///
/// A degenerate (zero or NaN) normal resolves to the Y axis with a
/// non-positive sign, so collapsed quads light as `Down`.
pub fn light_face(normal: Vec3) -> Direction {
    match longest_axis(normal) {
        Axis::X => if normal.x > 0.0 { Direction::East } else { Direction::West },
        Axis::Y => if normal.y > 0.0 { Direction::Up } else { Direction::Down },
        Axis::Z => if normal.z > 0.0 { Direction::South } else { Direction::North },
    }
}

/// Shape classification bits for a quad lit from `light_face`.
pub fn shape_flags(light_face: Direction, pos: &[Vec3; 4]) -> u32 {
    let mut bits = 0;

    if is_parallel_to_face(light_face, pos) {
        bits |= AXIS_ALIGNED_FLAG;

        if is_on_face(light_face, pos) {
            bits |= LIGHT_FACE_FLAG;
        }
    }

    if is_cubic(light_face, pos) {
        bits |= CUBIC_FLAG;
    }

    bits
}

fn is_parallel_to_face(face: Direction, pos: &[Vec3; 4]) -> bool {
    let i = face.axis().index();
    let v = pos[0][i];
    pos[1..].iter().all(|p| (p[i] - v).abs() < PLANE_EPSILON)
}

fn is_on_face(face: Direction, pos: &[Vec3; 4]) -> bool {
    let v = pos[0][face.axis().index()];
    if face.is_positive() { v >= EPS_MAX } else { v <= EPS_MIN }
}

fn is_cubic(face: Direction, pos: &[Vec3; 4]) -> bool {
    let (a, b) = match face.axis() {
        Axis::X => (Axis::Y, Axis::Z),
        Axis::Y => (Axis::X, Axis::Z),
        Axis::Z => (Axis::Y, Axis::X),
    };
    covers_square_corners(a.index(), b.index(), pos)
}

/// True when each vertex sits on a distinct corner of the unit square in (a, b).
fn covers_square_corners(a: usize, b: usize, pos: &[Vec3; 4]) -> bool {
    let mut corners = 0u32;

    for p in pos {
        let row = if p[a] <= EPS_MIN {
            0
        } else if p[a] >= EPS_MAX {
            2
        } else {
            return false;
        };
        let col = if p[b] <= EPS_MIN {
            0
        } else if p[b] >= EPS_MAX {
            1
        } else {
            return false;
        };
        corners |= 1 << (row + col);
    }

    corners == 0b1111
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(p: [[f32; 3]; 4]) -> [Vec3; 4] {
        p.map(Vec3::from_array)
    }

    fn full_up_face() -> [Vec3; 4] {
        quad([[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0]])
    }

    // ── light face ────────────────────────────────────────────────────────

    #[test]
    fn light_face_follows_normal_sign() {
        assert_eq!(light_face(Vec3::new(0.1, -0.9, 0.2)), Direction::Down);
        assert_eq!(light_face(Vec3::new(0.8, 0.1, 0.2)), Direction::East);
        assert_eq!(light_face(Vec3::new(-0.8, 0.1, 0.2)), Direction::West);
        assert_eq!(light_face(Vec3::new(0.1, 0.1, -0.9)), Direction::North);
    }

    #[test]
    fn ties_prefer_y_then_x() {
        assert_eq!(longest_axis(Vec3::new(1.0, 1.0, 0.0)), Axis::Y);
        assert_eq!(longest_axis(Vec3::new(1.0, 0.0, 1.0)), Axis::X);
        assert_eq!(longest_axis(Vec3::ONE), Axis::Y);
    }

    #[test]
    fn degenerate_normal_lights_down() {
        assert_eq!(light_face(Vec3::ZERO), Direction::Down);
        assert_eq!(light_face(Vec3::NAN), Direction::Down);

        let collapsed = quad([[0.5, 0.5, 0.5]; 4]);
        let g = Geometry::derive(&collapsed);
        assert_eq!(g.face_normal, Vec3::ZERO);
        assert_eq!(g.light_face, Direction::Down);
    }

    #[test]
    fn flag_bits_match_lighting_layout() {
        assert_eq!(CUBIC_FLAG, 1);
        assert_eq!(AXIS_ALIGNED_FLAG, 2);
        assert_eq!(LIGHT_FACE_FLAG, 4);

        let sunken = quad([[0.0, 0.5, 0.0], [0.0, 0.5, 1.0], [1.0, 0.5, 1.0], [1.0, 0.5, 0.0]]);
        assert_eq!(Geometry::derive(&sunken).flags, 0b011);
    }

    // ── shape flags ───────────────────────────────────────────────────────

    #[test]
    fn full_face_sets_every_flag() {
        let g = Geometry::derive(&full_up_face());
        assert_eq!(g.light_face, Direction::Up);
        assert_eq!(g.face_normal, Vec3::Y);
        assert_eq!(g.flags, AXIS_ALIGNED_FLAG | CUBIC_FLAG | LIGHT_FACE_FLAG);
    }

    #[test]
    fn inset_face_is_only_axis_aligned() {
        let p = quad([[0.25, 0.5, 0.25], [0.25, 0.5, 0.75], [0.75, 0.5, 0.75], [0.75, 0.5, 0.25]]);
        let g = Geometry::derive(&p);
        assert_eq!(g.light_face, Direction::Up);
        assert_eq!(g.flags, AXIS_ALIGNED_FLAG);
    }

    #[test]
    fn sunken_full_square_is_cubic_but_not_on_face() {
        let p = quad([[0.0, 0.5, 0.0], [0.0, 0.5, 1.0], [1.0, 0.5, 1.0], [1.0, 0.5, 0.0]]);
        assert_eq!(Geometry::derive(&p).flags, AXIS_ALIGNED_FLAG | CUBIC_FLAG);
    }

    #[test]
    fn tilted_quad_has_no_flags() {
        let p = quad([[0.0, 0.0, 0.0], [0.0, 0.2, 1.0], [1.0, 0.2, 1.0], [1.0, 0.0, 0.0]]);
        let g = Geometry::derive(&p);
        assert_eq!(g.light_face, Direction::Up);
        assert_eq!(g.flags & AXIS_ALIGNED_FLAG, 0);
        assert_eq!(g.flags & LIGHT_FACE_FLAG, 0);
    }

    #[test]
    fn derivation_is_idempotent() {
        let p = quad([[0.1, 0.0, 0.3], [0.0, 0.9, 1.0], [1.0, 0.7, 1.0], [0.8, 0.0, 0.1]]);
        assert_eq!(Geometry::derive(&p), Geometry::derive(&p));
    }
}
