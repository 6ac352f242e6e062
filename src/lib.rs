#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Chunk Manager
//!
//! The chunk core of a block-based voxel world: a block catalog, seeded terrain
//! generation, chunk storage with lazy loading and eviction, and face-culled
//! mesh building on worker threads.
//!
//! ## Key Modules
//!
//! * `config` - JSON world configuration
//! * `core` - Core utilities and data structures used throughout the crate
//! * `engine_state` - Voxels, meshing, and task management
//! * `error` - Error types for the fallible entry points
//!
//! ## Architecture
//!
//! The crate keeps a clear separation between:
//! * Voxel data (blocks, chunks, terrain, edits)
//! * Mesh building (face culling into interleaved vertex buffers)
//! * Task scheduling and execution
//!
//! Drawing the meshes is left to the embedding renderer, which provides the
//! atlas UV table and uploads the vertex buffers.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use voxel_chunk_manager::{BlockRegistry, ChunkCoord, UvTable, World, WorldConfig};
//!
//! let registry = BlockRegistry::with_default_blocks();
//! let (uv_table, _atlas_size) = UvTable::from_grid_layout(&registry.texture_names(), 16);
//!
//! let world = World::new(WorldConfig::default(), Arc::new(registry));
//! world.set_uv_table(uv_table);
//! world.load_area(ChunkCoord::new(0, 0), 1);
//! world.build_visible_meshes();
//! assert!(world.total_vertex_count() > 0);
//! ```

use std::{env, sync::Arc};

use log::{error, info};
use web_time::{Duration, Instant};

pub mod config;
pub mod core;
pub mod engine_state;
pub mod error;

pub use config::{TerrainConfig, WorldConfig};
pub use engine_state::{
    rendering::{
        meshing::{build_chunk_mesh, ChunkMesh, MeshOutcome, MeshScheduler},
        texture::{UvRect, UvTable},
        Vertex, FLOATS_PER_VERTEX,
    },
    voxels::{
        block::{BlockId, BlockRegistry, BlockSide, BlockType, AIR_ID},
        chunk::{Chunk, ChunkCoord, ChunkDimensions},
        modifications::ModificationLog,
        terrain::{TerrainDecorator, TerrainGenerator, TreeDecorator},
        world::World,
    },
    EngineState,
};
pub use error::{Result, VoxelError};

/// Edge length in pixels of one tile in the generated atlas layout.
pub const ATLAS_TILE_SIZE: u32 = 16;

/// How long [`run`] waits for the spawn area to finish meshing.
const SPAWN_TIMEOUT: Duration = Duration::from_secs(120);

/// Initializes the logger from `RUST_LOG`, writing to stdout.
///
/// Calling this more than once is harmless.
pub fn init_logger() {
    let mut log_builder = env_logger::Builder::new();
    let _ = log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .try_init();
}

/// Loads and meshes the spawn area of a world, then logs what was built.
///
/// The first command-line argument, if present, names a JSON configuration
/// file; otherwise the default configuration is used.
pub fn run() {
    init_logger();
    info!("Logger initialized");

    let config = match env::args().nth(1) {
        Some(path) => match WorldConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(err) => {
                error!("Could not load configuration: {}", err);
                return;
            }
        },
        None => WorldConfig::default(),
    };

    let registry = BlockRegistry::with_default_blocks();
    let (uv_table, atlas_size) = UvTable::from_grid_layout(&registry.texture_names(), ATLAS_TILE_SIZE);
    info!(
        "Laid out {} textures in a {}x{} atlas",
        uv_table.len(),
        atlas_size,
        atlas_size
    );

    let spawn_radius = config.spawn_radius;
    let workers = config.mesh_workers;
    let world = Arc::new(World::new(config, Arc::new(registry)));
    world.set_uv_table(uv_table);

    let start = Instant::now();
    let mut engine = EngineState::new(world.clone(), workers);
    engine.request_area(ChunkCoord::new(0, 0), spawn_radius);
    if !engine.run_until_idle(SPAWN_TIMEOUT) {
        error!("Spawn area did not finish loading");
        return;
    }

    let meshed = engine.drain_ready_meshes().len();
    info!(
        "Loaded {} chunks, meshed {} with {} vertices in {:?}",
        world.chunk_count(),
        meshed,
        world.total_vertex_count(),
        start.elapsed()
    );
}
