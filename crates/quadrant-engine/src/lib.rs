//! Quadrant engine crate.
//!
//! This crate owns the quad encoding, mesh storage and the item quad
//! pipeline. Hosts supply vertex sinks, tint palettes and legacy models
//! through the traits in [`render`].
//!
//! Layers, bottom up:
//! - `paint`, `material`: packed color, light and material values
//! - `mesh`: encoded quads, views, emitters and meshes
//! - `render`: pose stack, sinks and [`render::ItemRenderContext`]

pub mod config;
pub mod error;
pub mod logging;
pub mod material;
pub mod mesh;
pub mod paint;
pub mod render;

pub use config::ContextConfig;
pub use error::{MeshError, RenderError};
