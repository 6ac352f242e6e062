//! Decoration passes layered over base terrain.

use noise::{NoiseFn, Perlin};

use super::{TerrainDecorator, TerrainGenerator};
use crate::engine_state::voxels::{
    block::{BlockId, BlockRegistry, AIR_ID},
    chunk::Chunk,
};

/// Trunk height of a tree in blocks.
const TRUNK_HEIGHT: i32 = 3;

/// Places small trees: a three block log trunk topped by a 3x3 plank canopy.
///
/// A second Perlin field, offset from the height field and sampled at a much
/// finer scale, decides which columns root a tree. Trees only grow where the
/// whole tree fits under the chunk ceiling. Canopy blocks that would land in a
/// neighboring chunk are dropped, and no tree block replaces a non-air block.
pub struct TreeDecorator {
    noise: Perlin,
    threshold: f64,
    scale: f64,
    log: BlockId,
    canopy: BlockId,
}

impl TreeDecorator {
    /// Noise value a column must exceed to grow a tree.
    pub const DEFAULT_THRESHOLD: f64 = 0.35;

    /// Creates the pass using the `log` and `planks` blocks from `registry`.
    pub fn new(seed: u32, registry: &BlockRegistry) -> Self {
        TreeDecorator {
            noise: Perlin::new(seed),
            threshold: Self::DEFAULT_THRESHOLD,
            scale: 10.0,
            log: registry.id_of("log").unwrap_or(5),
            canopy: registry.id_of("planks").unwrap_or(4),
        }
    }

    /// Overrides the noise threshold; lower values grow denser forests.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Whether a tree is rooted in world column `(world_x, world_z)`.
    pub fn has_tree_at(&self, world_x: i32, world_z: i32) -> bool {
        let sample = self.noise.get([
            (world_x as f64 + 999.0) / self.scale,
            (world_z as f64 - 555.0) / self.scale,
        ]);
        sample > self.threshold
    }

    fn place(&self, chunk: &mut Chunk, x: i32, y: i32, z: i32, id: BlockId) {
        if chunk.get_block(x, y, z) == AIR_ID {
            chunk.set_block(x, y, z, id);
        }
    }
}

impl TerrainDecorator for TreeDecorator {
    fn name(&self) -> &str {
        "trees"
    }

    fn decorate(&self, chunk: &mut Chunk, terrain: &TerrainGenerator) {
        let offset = chunk.world_offset();
        let dimensions = chunk.dimensions();
        let ceiling = dimensions.height as i32;

        let mut roots = Vec::new();
        for x in 0..dimensions.width as i32 {
            for z in 0..dimensions.depth as i32 {
                let (world_x, world_z) = (offset.x.wrapping_add(x), offset.z.wrapping_add(z));
                let ground = terrain.height_at(world_x, world_z) - 1;
                if ground + TRUNK_HEIGHT + 1 < ceiling && self.has_tree_at(world_x, world_z) {
                    roots.push((x, ground, z));
                }
            }
        }

        // Trunks first so a neighboring canopy never cuts one short.
        for &(x, ground, z) in &roots {
            for dy in 1..=TRUNK_HEIGHT {
                self.place(chunk, x, ground + dy, z, self.log);
            }
        }
        for &(x, ground, z) in &roots {
            for dx in -1..=1 {
                for dz in -1..=1 {
                    self.place(chunk, x + dx, ground + TRUNK_HEIGHT, z + dz, self.canopy);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TerrainConfig;
    use crate::engine_state::voxels::chunk::{ChunkCoord, ChunkDimensions};

    #[test]
    fn trees_stand_on_grass() {
        let registry = BlockRegistry::with_default_blocks();
        let mut terrain = TerrainGenerator::new(
            5,
            TerrainConfig::default(),
            ChunkDimensions::REFERENCE,
            &registry,
        );
        let trees = TreeDecorator::new(5, &registry).with_threshold(-1.0);
        assert!(trees.has_tree_at(3, 3));
        terrain.add_decorator(Box::new(trees));

        let chunk = terrain.generate(ChunkCoord::new(0, 0), ChunkDimensions::REFERENCE);
        let ground = terrain.height_at(4, 4) - 1;
        assert_eq!(chunk.get_block(4, ground, 4), 3);
        assert_eq!(chunk.get_block(4, ground + 1, 4), 5);
        assert_eq!(chunk.get_block(4, ground + 3, 4), 5);
    }

    #[test]
    fn canopy_never_replaces_existing_blocks() {
        let registry = BlockRegistry::with_default_blocks();
        let trees = TreeDecorator::new(5, &registry);
        let mut chunk = Chunk::empty(ChunkCoord::new(0, 0), ChunkDimensions::new(3, 8, 3));
        chunk.set_block(0, 4, 0, 7);
        trees.place(&mut chunk, 0, 4, 0, 4);
        trees.place(&mut chunk, 1, 4, 0, 4);
        assert_eq!(chunk.get_block(0, 4, 0), 7);
        assert_eq!(chunk.get_block(1, 4, 0), 4);
    }
}
