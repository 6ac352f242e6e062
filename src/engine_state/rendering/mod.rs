//! Rendering-side data for the voxel engine.
//!
//! This module turns chunk grids into GPU-ready vertex data. It owns the
//! vertex layout, the atlas UV lookup and the background mesh tasks; drawing
//! the buffers is left to the embedding renderer.

pub mod meshing;
pub mod tasks;
pub mod texture;
pub mod vertex;

// Re-export commonly used types
pub use vertex::{Vertex, FLOATS_PER_VERTEX};
