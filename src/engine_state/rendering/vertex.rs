//! Vertex data structures for voxel meshes.
//!
//! This module defines the vertex record emitted by the mesher and consumed by
//! the external renderer.

use cgmath::Point3;

/// Number of `f32`s per vertex in the flat buffer view.
pub const FLOATS_PER_VERTEX: usize = 6;

/// A vertex in a chunk mesh.
///
/// Positions are chunk-local block corners; the renderer adds the chunk's
/// world offset.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Light: f32 (4 bytes)
///
/// Total size: 24 bytes, six tightly packed floats.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Chunk-local position
    pub position: [f32; 3],
    /// Atlas UV coordinates
    pub tex_coords: [f32; 2],
    /// Static per-face brightness
    pub light: f32,
}

impl Vertex {
    /// Creates a new vertex with the given parameters.
    ///
    /// # Arguments
    /// * `pos` - The chunk-local corner position
    /// * `u` - U atlas coordinate
    /// * `v` - V atlas coordinate
    /// * `light` - Brightness of the face this vertex belongs to
    ///
    /// # Returns
    /// A new `Vertex` instance
    pub fn new(pos: Point3<i32>, u: f32, v: f32, light: f32) -> Self {
        Vertex {
            position: [pos.x as f32, pos.y as f32, pos.z as f32],
            tex_coords: [u, v],
            light,
        }
    }
}
