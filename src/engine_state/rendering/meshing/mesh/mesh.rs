//! Mesh data structures and the face-culling mesher.
//!
//! This module turns a chunk's block grid into a flat triangle list: for every
//! solid block, each face whose neighbor is not solid becomes a quad of two
//! triangles.

use bitvec::prelude::BitVec;
use log::debug;
use web_time::Instant;

use super::face::Face;
use crate::engine_state::rendering::{
    texture::{UvRect, UvTable},
    vertex::FLOATS_PER_VERTEX,
    Vertex,
};
use crate::engine_state::voxels::{
    block::{block_side::BlockSide, BlockId, BlockRegistry},
    chunk::Chunk,
};

/// Corner indices of the two triangles making up a quad.
pub const QUAD_TRIANGLE_CORNERS: [usize; 6] = [0, 1, 2, 2, 3, 0];

/// Vertices emitted per visible face.
pub const VERTICES_PER_QUAD: usize = QUAD_TRIANGLE_CORNERS.len();

/// A chunk's renderable triangle list.
///
/// Vertices are unindexed: every six consecutive vertices are one quad. The
/// buffer can be handed to the renderer as-is through
/// [`as_floats`](ChunkMesh::as_floats).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChunkMesh {
    vertices: Vec<Vertex>,
}

impl ChunkMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the two triangles of `face`, textured with `uv`.
    pub fn push_face(&mut self, face: &Face, uv: UvRect) {
        let corners = face.vertices(uv);
        self.vertices
            .extend(QUAD_TRIANGLE_CORNERS.iter().map(|&corner| corners[corner]));
    }

    /// The vertex records.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// The vertex buffer as a flat `[x, y, z, u, v, light, ...]` slice.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The vertex buffer as raw bytes, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of floats in [`as_floats`](ChunkMesh::as_floats).
    pub fn float_count(&self) -> usize {
        self.vertices.len() * FLOATS_PER_VERTEX
    }

    /// Number of quads (visible faces).
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_QUAD
    }

    /// Returns `true` if the mesh holds no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Builds the face-culled mesh of `chunk`.
///
/// Blocks are visited x-major, then y, then z, and their faces in
/// [`BlockSide::all`] order, so the output is fully determined by the grid, the
/// registry and the UV table. A neighbor outside the chunk counts as air.
///
/// # Arguments
/// * `chunk` - The chunk to mesh
/// * `registry` - Source of block solidity and face textures
/// * `uv_table` - Atlas lookup; missing textures map to the unit rectangle
///
/// # Returns
/// The mesh, or `None` if no face is visible.
pub fn build_chunk_mesh(
    chunk: &Chunk,
    registry: &BlockRegistry,
    uv_table: &UvTable,
) -> Option<ChunkMesh> {
    let start = Instant::now();
    let solid_mask = registry.solid_mask();
    let mut mesh = ChunkMesh::new();

    for (position, id) in chunk.iter_blocks() {
        if !is_solid(&solid_mask, id) {
            continue;
        }
        let block = registry.get(id);

        for side in BlockSide::all() {
            let neighbor = position + side.normal();
            if is_solid(&solid_mask, chunk.get_block(neighbor.x, neighbor.y, neighbor.z)) {
                continue;
            }

            let face = Face::new(position.x, position.y, position.z, side);
            mesh.push_face(&face, uv_table.get_or_unit(block.texture_for(side)));
        }
    }

    debug!(
        "Meshed chunk {} in {:?}: {} quads",
        chunk.coord(),
        start.elapsed(),
        mesh.quad_count()
    );

    (!mesh.is_empty()).then_some(mesh)
}

fn is_solid(mask: &BitVec, id: BlockId) -> bool {
    mask.get(id as usize).map_or(false, |bit| *bit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::BlockType;
    use crate::engine_state::voxels::chunk::{ChunkCoord, ChunkDimensions};

    fn chunk() -> Chunk {
        Chunk::empty(ChunkCoord::new(0, 0), ChunkDimensions::new(4, 4, 4))
    }

    #[test]
    fn isolated_block_has_six_quads() {
        let registry = BlockRegistry::with_default_blocks();
        let mut chunk = chunk();
        chunk.set_block(1, 1, 1, 1);

        let mesh = build_chunk_mesh(&chunk, &registry, &UvTable::new()).unwrap();
        assert_eq!(mesh.quad_count(), 6);
        assert_eq!(mesh.vertex_count(), 36);
        assert_eq!(mesh.as_floats().len(), 216);
        assert_eq!(mesh.float_count(), 216);
    }

    #[test]
    fn non_solid_neighbors_do_not_occlude() {
        let mut registry = BlockRegistry::with_default_blocks();
        registry.register(BlockType::uniform(9, "water", "water", 0.0).with_solid(false));
        let mut chunk = chunk();
        chunk.set_block(1, 1, 1, 1);
        chunk.set_block(2, 1, 1, 9);

        let mesh = build_chunk_mesh(&chunk, &registry, &UvTable::new()).unwrap();
        assert_eq!(mesh.quad_count(), 6);
    }

    #[test]
    fn unknown_ids_are_treated_as_air() {
        let registry = BlockRegistry::with_default_blocks();
        let mut chunk = chunk();
        chunk.set_block(0, 0, 0, 500);
        assert!(build_chunk_mesh(&chunk, &registry, &UvTable::new()).is_none());
    }

    #[test]
    fn faces_use_per_side_textures() {
        let registry = BlockRegistry::with_default_blocks();
        let mut uv_table = UvTable::new();
        uv_table.insert("grass_top", UvRect::new(0.5, 0.5, 1.0, 1.0));
        let mut chunk = chunk();
        chunk.set_block(0, 0, 0, 3);

        let mesh = build_chunk_mesh(&chunk, &registry, &uv_table).unwrap();
        let top = &mesh.vertices()[2 * VERTICES_PER_QUAD..3 * VERTICES_PER_QUAD];
        assert!(top.iter().all(|v| v.position[1] == 1.0 && v.light == 1.0));
        assert!(top.iter().all(|v| v.tex_coords[0] >= 0.5));
        let side = &mesh.vertices()[..VERTICES_PER_QUAD];
        assert_eq!(side[0].tex_coords, [0.0, 1.0]);
    }
}
