//! # Block Side Module
//!
//! This module defines the six faces of a voxel block, in the slot order used by
//! block texture tables: +X, -X, +Y, -Y, +Z, -Z.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The discriminant is the face's slot in [`BlockType::textures`](super::BlockType),
/// so `side as usize` indexes a texture table directly.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The face pointing toward +X
    RIGHT = 0,

    /// The face pointing toward -X
    LEFT = 1,

    /// The face pointing toward +Y
    TOP = 2,

    /// The face pointing toward -Y
    BOTTOM = 3,

    /// The face pointing toward +Z
    FRONT = 4,

    /// The face pointing toward -Z
    BACK = 5,
}

impl BlockSide {
    /// Returns all six faces in texture-slot order.
    ///
    /// The mesher walks faces in this order, which fixes the order of quads
    /// emitted for a single block.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::RIGHT,
            BlockSide::LEFT,
            BlockSide::TOP,
            BlockSide::BOTTOM,
            BlockSide::FRONT,
            BlockSide::BACK,
        ]
    }

    /// Unit offset from a block to its neighbor across this face.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::BACK => Vector3::new(0, 0, -1),
        }
    }

    /// Static brightness for faces pointing this way.
    ///
    /// Top faces are fully lit, bottoms darkest, and the two side axes get
    /// slightly different values so adjacent walls stay distinguishable.
    pub fn light(self) -> f32 {
        match self {
            BlockSide::TOP => 1.0,
            BlockSide::BOTTOM => 0.6,
            BlockSide::RIGHT | BlockSide::LEFT => 0.85,
            BlockSide::FRONT | BlockSide::BACK => 0.8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminants_match_texture_slots() {
        for (slot, side) in BlockSide::all().into_iter().enumerate() {
            assert_eq!(side as usize, slot);
        }
    }

    #[test]
    fn opposite_sides_have_opposite_normals() {
        let pairs = [
            (BlockSide::RIGHT, BlockSide::LEFT),
            (BlockSide::TOP, BlockSide::BOTTOM),
            (BlockSide::FRONT, BlockSide::BACK),
        ];
        for (a, b) in pairs {
            assert_eq!(a.normal() + b.normal(), Vector3::new(0, 0, 0));
        }
    }

    #[test]
    fn top_is_brightest_and_bottom_darkest() {
        for side in BlockSide::all() {
            assert!(side.light() <= BlockSide::TOP.light());
            assert!(side.light() >= BlockSide::BOTTOM.light());
        }
    }
}
