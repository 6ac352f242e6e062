//! # Block Registry
//!
//! The catalog of [`BlockType`]s known to a world. A registry is built once at
//! startup and then shared read-only behind an `Arc`; there is no global table.

use std::collections::HashMap;

use bitvec::prelude::BitVec;
use log::warn;

use super::{BlockId, BlockType, AIR_ID};

/// Maps block ids and names to their [`BlockType`].
///
/// Lookups never fail: an unknown id resolves to air. Registration overwrites
/// silently, by id and by name, so the last registration wins.
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    by_id: HashMap<BlockId, BlockType>,
    by_name: HashMap<String, BlockId>,
    air: BlockType,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    /// Creates a registry containing only air.
    pub fn new() -> Self {
        let air = BlockType::air();
        let mut by_name = HashMap::new();
        by_name.insert(air.name.clone(), AIR_ID);
        let mut by_id = HashMap::new();
        by_id.insert(AIR_ID, air.clone());

        BlockRegistry { by_id, by_name, air }
    }

    /// Creates a registry holding the stock block catalog.
    ///
    /// | id | name   | textures (+X,-X,+Y,-Y,+Z,-Z)            | hardness |
    /// |----|--------|------------------------------------------|----------|
    /// | 1  | stone  | stone                                    | 3.0      |
    /// | 2  | dirt   | dirt                                     | 0.5      |
    /// | 3  | grass  | grass_side, top grass_top, bottom dirt   | 0.6      |
    /// | 4  | planks | planks_oak                               | 1.5      |
    /// | 5  | log    | log_oak, top/bottom log_oak_top          | 2.0      |
    /// | 6  | sand   | sand                                     | 0.5      |
    /// | 7  | glass  | glass                                    | 0.3      |
    pub fn with_default_blocks() -> Self {
        let mut registry = Self::new();
        registry.register(BlockType::uniform(1, "stone", "stone", 3.0));
        registry.register(BlockType::uniform(2, "dirt", "dirt", 0.5));
        registry.register(BlockType::new(
            3,
            "grass",
            [
                "grass_side",
                "grass_side",
                "grass_top",
                "dirt",
                "grass_side",
                "grass_side",
            ],
            0.6,
        ));
        registry.register(BlockType::uniform(4, "planks", "planks_oak", 1.5));
        registry.register(BlockType::new(
            5,
            "log",
            [
                "log_oak",
                "log_oak",
                "log_oak_top",
                "log_oak_top",
                "log_oak",
                "log_oak",
            ],
            2.0,
        ));
        registry.register(BlockType::uniform(6, "sand", "sand", 0.5));
        registry.register(BlockType::uniform(7, "glass", "glass", 0.3));
        registry
    }

    /// Adds or replaces a block type.
    ///
    /// Replacing an id drops the name the old entry was registered under, and
    /// registering a name already bound to another id rebinds the name. Attempts
    /// to register over id 0 are ignored so air stays air.
    ///
    /// # Arguments
    /// * `block` - The block type to register
    pub fn register(&mut self, block: BlockType) {
        if block.id == AIR_ID {
            warn!("Ignoring registration of '{}' over the air id", block.name);
            return;
        }

        if self.by_name.get(&block.name) == Some(&AIR_ID) {
            warn!("Ignoring registration of block {} under the name 'air'", block.id);
            return;
        }

        if let Some(old) = self.by_id.get(&block.id) {
            if self.by_name.get(&old.name) == Some(&old.id) {
                self.by_name.remove(&old.name);
            }
        }

        self.by_name.insert(block.name.clone(), block.id);
        self.by_id.insert(block.id, block);
    }

    /// Returns the block registered under `id`, or air.
    pub fn get(&self, id: BlockId) -> &BlockType {
        self.by_id.get(&id).unwrap_or(&self.air)
    }

    /// Returns the block registered under `name`, if any.
    pub fn by_name(&self, name: &str) -> Option<&BlockType> {
        self.by_name.get(name).and_then(|id| self.by_id.get(id))
    }

    /// Returns the id registered under `name`, if any.
    pub fn id_of(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    /// Solidity of `id`; unknown ids are air and therefore not solid.
    pub fn is_solid(&self, id: BlockId) -> bool {
        self.get(id).solid
    }

    /// Number of registered block types, air included.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Always `false`: air is registered from construction.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Iterates over the registered blocks in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &BlockType> {
        self.by_id.values()
    }

    /// Every distinct texture name referenced by a registered block, sorted.
    ///
    /// Feed this to [`UvTable::from_grid_layout`](crate::UvTable::from_grid_layout)
    /// to lay out an atlas covering the whole catalog.
    pub fn texture_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .by_id
            .values()
            .flat_map(|block| block.textures.iter())
            .filter(|name| !name.is_empty())
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// A bit per block id, set when that id is solid.
    ///
    /// Ids past the end of the mask are unknown and read as air. The mesher takes
    /// one snapshot per rebuild instead of hashing for every neighbor.
    pub fn solid_mask(&self) -> BitVec {
        let max_id = self.by_id.keys().copied().max().unwrap_or(AIR_ID) as usize;
        let mut mask = BitVec::repeat(false, max_id + 1);
        for block in self.by_id.values() {
            mask.set(block.id as usize, block.solid);
        }
        mask
    }
}
