//! # Configuration
//!
//! Runtime configuration for the world, the terrain generator and the worker pool.
//! Every field has a default matching the reference sizing, so an empty JSON
//! object (or no file at all) yields a working setup.
//!
//! ```
//! use voxel_chunk_manager::config::WorldConfig;
//!
//! let config = WorldConfig::from_json_str(r#"{ "seed": 1337, "terrain": { "trees": true } }"#).unwrap();
//! assert_eq!(config.seed, 1337);
//! assert_eq!(config.chunk.height, 128);
//! assert!(config.terrain.trees);
//! ```

use std::{fs, path::Path};

use serde::Deserialize;

use crate::{
    engine_state::voxels::chunk::ChunkDimensions,
    error::{Result, VoxelError},
};

/// Top-level configuration for a [`World`](crate::World) and the
/// [`EngineState`](crate::EngineState) pipeline that drives it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed for every noise field used by terrain generation.
    pub seed: u32,
    /// Chunk grid dimensions in blocks.
    pub chunk: ChunkDimensions,
    /// Terrain shaping parameters.
    pub terrain: TerrainConfig,
    /// Number of worker threads for generation and meshing. Zero runs tasks inline.
    pub mesh_workers: usize,
    /// Upper bound on resident chunks; least recently used chunks are evicted past it.
    pub max_loaded_chunks: Option<usize>,
    /// Radius, in chunks, preloaded around the spawn chunk.
    pub spawn_radius: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            seed: 42,
            chunk: ChunkDimensions::REFERENCE,
            terrain: TerrainConfig::default(),
            mesh_workers: 4,
            max_loaded_chunks: None,
            spawn_radius: 2,
        }
    }
}

/// Parameters of the height-field generator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// World coordinates are divided by this before sampling noise.
    pub horizontal_scale: f64,
    /// Number of fBm octaves.
    pub octaves: usize,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// Lowest surface height produced before clamping.
    pub base_height: i32,
    /// Fraction of the chunk height spanned by the noise band.
    pub height_fraction: f64,
    /// Layers of dirt between the grass cap and the stone below.
    pub dirt_depth: i32,
    /// Run the tree decoration pass after the base terrain.
    pub trees: bool,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig {
            horizontal_scale: 128.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            base_height: 32,
            height_fraction: 0.6,
            dirt_depth: 3,
            trees: false,
        }
    }
}

impl WorldConfig {
    /// Parses and validates a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| VoxelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Checks ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let ChunkDimensions {
            width,
            height,
            depth,
        } = self.chunk;
        if width == 0 || depth == 0 || height < 2 {
            return Err(VoxelError::InvalidConfig(format!(
                "chunk dimensions {}x{}x{} are too small",
                width, height, depth
            )));
        }
        if self.terrain.octaves == 0 {
            return Err(VoxelError::InvalidConfig("terrain.octaves must be at least 1".into()));
        }
        if self.terrain.horizontal_scale <= 0.0 {
            return Err(VoxelError::InvalidConfig(
                "terrain.horizontal_scale must be positive".into(),
            ));
        }
        if self.terrain.dirt_depth < 0 {
            return Err(VoxelError::InvalidConfig("terrain.dirt_depth must not be negative".into()));
        }
        if self.max_loaded_chunks == Some(0) {
            return Err(VoxelError::InvalidConfig("max_loaded_chunks must be at least 1".into()));
        }
        if self.spawn_radius < 0 {
            return Err(VoxelError::InvalidConfig("spawn_radius must not be negative".into()));
        }
        Ok(())
    }
}
