//! Background tasks for the rendering system.
//!
//! # Available Tasks
//! - `ChunkMeshGenerationTask`: Rebuilds a chunk's mesh in the background

pub mod chunk_mesh_generation_task;
