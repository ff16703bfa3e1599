//! Recoverable error types.
//!
//! Precondition violations (sprite index other than 0, vertex index above 3)
//! are programmer errors and panic at the call site instead of showing up here.

use thiserror::Error;

use crate::mesh::TOTAL_STRIDE;

/// Errors raised when raw words or bytes are turned into a [`Mesh`](crate::mesh::Mesh).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("mesh length {len} is not a multiple of the quad stride ({} words)", TOTAL_STRIDE)]
    Misaligned { len: usize },

    #[error("mesh bytes do not form a word slice: {0}")]
    Cast(bytemuck::PodCastError),
}

impl From<bytemuck::PodCastError> for MeshError {
    fn from(err: bytemuck::PodCastError) -> Self {
        MeshError::Cast(err)
    }
}

/// Errors raised by [`ItemRenderContext`](crate::render::ItemRenderContext).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// A render call was started while another one on the same context was active.
    #[error("render context is already {phase}; nested render calls are not supported")]
    Reentrant { phase: &'static str },
}
