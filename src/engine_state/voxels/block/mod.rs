//! # Block Module
//!
//! This module provides the block-related types of the voxel world: the compact
//! id stored in chunk grids, the immutable [`BlockType`] description looked up
//! from that id, the six block faces, and the [`BlockRegistry`] mapping between
//! them.

pub mod block_registry;
pub mod block_side;

pub use block_registry::BlockRegistry;
pub use block_side::BlockSide;

/// The integer type stored per cell in chunk grids.
pub type BlockId = u16;

/// Id reserved for air. Never solid, never remapped.
pub const AIR_ID: BlockId = 0;

/// Name under which air is registered.
pub const AIR_NAME: &str = "air";

/// An immutable description of one kind of block.
///
/// Chunks only store [`BlockId`]s; everything else about a block is looked up
/// here through the registry.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockType {
    /// Numeric id stored in chunk grids.
    pub id: BlockId,
    /// Unique human-readable name, also used by the modification log.
    pub name: String,
    /// Texture names per face, indexed by [`BlockSide`] (+X, -X, +Y, -Y, +Z, -Z).
    pub textures: [String; 6],
    /// Whether the block occludes neighboring faces.
    pub solid: bool,
    /// Mining hardness.
    pub hardness: f32,
}

impl BlockType {
    /// Creates a solid block with explicit per-face textures.
    pub fn new(id: BlockId, name: &str, textures: [&str; 6], hardness: f32) -> Self {
        BlockType {
            id,
            name: name.to_string(),
            textures: textures.map(str::to_string),
            solid: true,
            hardness,
        }
    }

    /// Creates a solid block that uses the same texture on every face.
    pub fn uniform(id: BlockId, name: &str, texture: &str, hardness: f32) -> Self {
        Self::new(id, name, [texture; 6], hardness)
    }

    /// The air block: id 0, no textures, not solid, zero hardness.
    pub fn air() -> Self {
        BlockType {
            id: AIR_ID,
            name: AIR_NAME.to_string(),
            textures: Default::default(),
            solid: false,
            hardness: 0.0,
        }
    }

    /// Returns a copy of this block with a different solid flag.
    pub fn with_solid(mut self, solid: bool) -> Self {
        self.solid = solid;
        self
    }

    /// Texture name for a face. An empty slot falls back to the +X slot.
    pub fn texture_for(&self, side: BlockSide) -> &str {
        let name = &self.textures[side as usize];
        if name.is_empty() {
            &self.textures[BlockSide::RIGHT as usize]
        } else {
            name
        }
    }

    /// Returns `true` for the air block.
    pub fn is_air(&self) -> bool {
        self.id == AIR_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn air_upholds_its_invariants() {
        let air = BlockType::air();
        assert_eq!(air.id, AIR_ID);
        assert_eq!(air.name, "air");
        assert!(!air.solid);
        assert_eq!(air.hardness, 0.0);
        assert!(air.is_air());
    }

    #[test]
    fn empty_face_slot_falls_back_to_first_slot() {
        let block = BlockType::new(9, "odd", ["side", "", "top", "", "", ""], 1.0);
        assert_eq!(block.texture_for(BlockSide::TOP), "top");
        assert_eq!(block.texture_for(BlockSide::LEFT), "side");
        assert_eq!(block.texture_for(BlockSide::BACK), "side");
    }
}
