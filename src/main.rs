//! # Voxel Chunk Manager Entry Point
//!
//! Loads and meshes the spawn area of a world and reports the result.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- world.json
//! ```

fn main() {
    voxel_chunk_manager::run();
}
