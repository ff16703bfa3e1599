//! Quad encoding, views and mesh storage.
//!
//! Layout:
//! - `encoding`: word offsets and header bit packing
//! - `view`: read path over any word storage
//! - `mutable`: write path, `clear`, legacy conversion, [`QuadEmitter`]
//! - `builder`: [`Mesh`] and [`MeshBuilder`]
//!
//! Derived geometry lives in `geometry` and is recomputed lazily by views.

pub mod direction;
pub mod encoding;
pub mod geometry;
pub mod normal;

mod builder;
mod legacy;
mod mutable;
mod view;

pub use builder::{Mesh, MeshBuilder, MeshEmitter};
pub use direction::{Axis, Direction};
pub use encoding::{HEADER_STRIDE, QUAD_STRIDE, TOTAL_STRIDE, VERTEX_STRIDE};
pub use geometry::Geometry;
pub use legacy::LegacyQuad;
pub use mutable::QuadEmitter;
pub use view::{MutableQuad, QuadRef, QuadView};
