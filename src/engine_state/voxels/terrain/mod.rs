//! # Terrain Generation
//!
//! Deterministic height-field terrain. A fractal Perlin field gives a surface
//! height per world column; each column is then filled with a grass cap, a few
//! layers of dirt and stone down to the bottom of the chunk.
//!
//! After the base pass, any registered [`TerrainDecorator`]s run in
//! registration order and may place additional blocks (trees, ores, ...).

use log::{debug, warn};
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use super::{
    block::{BlockId, BlockRegistry},
    chunk::{Chunk, ChunkCoord, ChunkDimensions},
};
use crate::config::{TerrainConfig, WorldConfig};

pub mod decoration;

pub use decoration::TreeDecorator;

/// A pass that places blocks on top of freshly generated base terrain.
///
/// Decorators must be deterministic in the chunk coordinate and the world
/// seed, otherwise a regenerated chunk will not match its first generation.
pub trait TerrainDecorator: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &str;

    /// Adds blocks to `chunk`, whose base terrain has already been generated.
    ///
    /// # Arguments
    /// * `chunk` - The chunk to decorate
    /// * `terrain` - The generator, for height queries
    fn decorate(&self, chunk: &mut Chunk, terrain: &TerrainGenerator);
}

/// Generates the block grid of a chunk from its coordinate and the world seed.
pub struct TerrainGenerator {
    /// Seed shared by every noise field.
    seed: u32,
    /// Shaping parameters.
    config: TerrainConfig,
    /// Height of the chunks this generator clamps against.
    chunk_height: usize,
    /// Surface height noise.
    height_noise: Fbm<Perlin>,
    /// Block placed at the top of each column.
    grass: BlockId,
    /// Block placed under the grass cap.
    dirt: BlockId,
    /// Block filling the rest of the column.
    stone: BlockId,
    /// Passes run after the base terrain, in order.
    decorators: Vec<Box<dyn TerrainDecorator>>,
}

impl TerrainGenerator {
    /// Creates a generator with explicit shaping parameters.
    ///
    /// Column materials are resolved by name (`grass`, `dirt`, `stone`) from the
    /// registry; a missing name falls back to the stock id for that material.
    ///
    /// # Arguments
    /// * `seed` - Seed for the noise fields
    /// * `config` - Shaping parameters
    /// * `dimensions` - Chunk size the heights are clamped to
    /// * `registry` - Registry providing the column materials
    pub fn new(
        seed: u32,
        config: TerrainConfig,
        dimensions: ChunkDimensions,
        registry: &BlockRegistry,
    ) -> Self {
        let height_noise = Fbm::<Perlin>::new(seed)
            .set_octaves(config.octaves)
            .set_persistence(config.persistence)
            .set_lacunarity(config.lacunarity);

        TerrainGenerator {
            seed,
            chunk_height: dimensions.height,
            height_noise,
            grass: Self::material(registry, "grass", 3),
            dirt: Self::material(registry, "dirt", 2),
            stone: Self::material(registry, "stone", 1),
            config,
            decorators: Vec::new(),
        }
    }

    /// Creates a generator from a world configuration, registering the tree
    /// pass when `terrain.trees` is set.
    pub fn from_config(config: &WorldConfig, registry: &BlockRegistry) -> Self {
        let mut generator = Self::new(config.seed, config.terrain.clone(), config.chunk, registry);
        if config.terrain.trees {
            generator.add_decorator(Box::new(TreeDecorator::new(config.seed, registry)));
        }
        generator
    }

    fn material(registry: &BlockRegistry, name: &str, fallback: BlockId) -> BlockId {
        registry.id_of(name).unwrap_or_else(|| {
            warn!("No '{}' block registered, using id {}", name, fallback);
            fallback
        })
    }

    /// Appends a decoration pass. Passes run in the order they were added.
    pub fn add_decorator(&mut self, decorator: Box<dyn TerrainDecorator>) {
        debug!("Registered terrain decorator '{}'", decorator.name());
        self.decorators.push(decorator);
    }

    /// Number of registered decoration passes.
    pub fn decorator_count(&self) -> usize {
        self.decorators.len()
    }

    /// The seed every noise field is built from.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// The shaping parameters.
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Chunk height the height field is clamped to.
    pub fn chunk_height(&self) -> usize {
        self.chunk_height
    }

    /// Surface height of world column `(world_x, world_z)`.
    ///
    /// The top solid block of the column sits at `height_at(..) - 1`. The result
    /// is a pure function of the coordinates and the seed, and always lies in
    /// `[1, chunk_height - 1]`.
    pub fn height_at(&self, world_x: i32, world_z: i32) -> i32 {
        let scale = self.config.horizontal_scale;
        let sample = self
            .height_noise
            .get([world_x as f64 / scale, world_z as f64 / scale]);
        let folded = (sample * 0.5 + 0.5).clamp(0.0, 1.0);

        let band = self.chunk_height as f64 * self.config.height_fraction;
        let height = (folded * band) as i32 + self.config.base_height;
        height.clamp(1, self.chunk_height as i32 - 1)
    }

    /// Fills `chunk` with terrain, then runs the decoration passes.
    ///
    /// Every column gets grass at its top block, `dirt_depth` layers of dirt
    /// below it and stone down to `y = 0`. Cells above the surface are left as
    /// they were (air for a fresh chunk).
    pub fn generate_chunk(&self, chunk: &mut Chunk) {
        let offset = chunk.world_offset();
        let dimensions = chunk.dimensions();

        for x in 0..dimensions.width as i32 {
            for z in 0..dimensions.depth as i32 {
                let top = self.height_at(offset.x.wrapping_add(x), offset.z.wrapping_add(z)) - 1;
                let dirt_start = top - self.config.dirt_depth;

                chunk.fill_column(x, z, 0, dirt_start, self.stone);
                chunk.fill_column(x, z, dirt_start, top, self.dirt);
                chunk.fill_column(x, z, top, top + 1, self.grass);
            }
        }

        for decorator in &self.decorators {
            decorator.decorate(chunk, self);
        }
    }

    /// Generates a fresh chunk at `coord`.
    pub fn generate(&self, coord: ChunkCoord, dimensions: ChunkDimensions) -> Chunk {
        let mut chunk = Chunk::empty(coord, dimensions);
        self.generate_chunk(&mut chunk);
        chunk
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(seed: u32) -> TerrainGenerator {
        TerrainGenerator::new(
            seed,
            TerrainConfig::default(),
            ChunkDimensions::REFERENCE,
            &BlockRegistry::with_default_blocks(),
        )
    }

    #[test]
    fn heights_are_deterministic_and_in_range() {
        let a = generator(7);
        let b = generator(7);
        for x in (-300..300).step_by(37) {
            for z in (-300..300).step_by(41) {
                let h = a.height_at(x, z);
                assert_eq!(h, b.height_at(x, z));
                assert!((1..=127).contains(&h));
            }
        }
    }

    #[test]
    fn columns_follow_grass_dirt_stone() {
        let terrain = generator(99);
        let chunk = terrain.generate(ChunkCoord::new(2, -3), ChunkDimensions::REFERENCE);
        let offset = chunk.world_offset();

        for x in 0..16 {
            for z in 0..16 {
                let top = terrain.height_at(offset.x + x, offset.z + z) - 1;
                assert_eq!(chunk.highest_block(x, z), Some(top));
                assert_eq!(chunk.get_block(x, top, z), 3);
                for y in 0..top {
                    let expected = if y >= top - 3 { 2 } else { 1 };
                    assert_eq!(chunk.get_block(x, y, z), expected, "column ({x}, {z}) y {y}");
                }
            }
        }
    }

    struct Marker;

    impl TerrainDecorator for Marker {
        fn name(&self) -> &str {
            "marker"
        }

        fn decorate(&self, chunk: &mut Chunk, _terrain: &TerrainGenerator) {
            chunk.set_block(0, 127, 0, 7);
        }
    }

    #[test]
    fn decorators_run_after_base_pass() {
        let mut terrain = generator(1);
        terrain.add_decorator(Box::new(Marker));
        let chunk = terrain.generate(ChunkCoord::new(0, 0), ChunkDimensions::REFERENCE);
        assert_eq!(chunk.get_block(0, 127, 0), 7);
        assert_eq!(terrain.decorator_count(), 1);
    }
}
