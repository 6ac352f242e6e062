use cgmath::Point3;

use crate::engine_state::rendering::{texture::UvRect, Vertex};
use crate::engine_state::voxels::block::block_side::BlockSide;

/// Represents a single quad face of a voxel in the mesh.
///
/// The four corners are stored in emission order: lower-left, lower-right,
/// upper-right, upper-left as seen from outside the block. That order is
/// counter-clockwise from outside, so `(lr - ll) x (ur - ll)` points along the
/// face's outward normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Lower-left corner of the face in chunk coordinates
    pub ll: Point3<i32>,
    /// Lower-right corner of the face in chunk coordinates
    pub lr: Point3<i32>,
    /// Upper-right corner of the face in chunk coordinates
    pub ur: Point3<i32>,
    /// Upper-left corner of the face in chunk coordinates
    pub ul: Point3<i32>,
    /// Which side of the block this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// Creates the face of the unit cube at `(i, j, k)` on the given side.
    ///
    /// # Arguments
    /// * `i`, `j`, `k` - The coordinates of the voxel in chunk space
    /// * `block_side` - Which side of the block this face represents
    ///
    /// # Returns
    /// A new `Face` with corners wound counter-clockwise from outside.
    pub fn new(i: i32, j: i32, k: i32, block_side: BlockSide) -> Self {
        let p = Point3::new;
        let (ll, lr, ur, ul) = match block_side {
            BlockSide::RIGHT => (
                p(i + 1, j, k + 1),
                p(i + 1, j, k),
                p(i + 1, j + 1, k),
                p(i + 1, j + 1, k + 1),
            ),
            BlockSide::LEFT => (
                p(i, j, k),
                p(i, j, k + 1),
                p(i, j + 1, k + 1),
                p(i, j + 1, k),
            ),
            BlockSide::TOP => (
                p(i, j + 1, k + 1),
                p(i + 1, j + 1, k + 1),
                p(i + 1, j + 1, k),
                p(i, j + 1, k),
            ),
            BlockSide::BOTTOM => (
                p(i, j, k),
                p(i + 1, j, k),
                p(i + 1, j, k + 1),
                p(i, j, k + 1),
            ),
            BlockSide::FRONT => (
                p(i, j, k + 1),
                p(i + 1, j, k + 1),
                p(i + 1, j + 1, k + 1),
                p(i, j + 1, k + 1),
            ),
            BlockSide::BACK => (
                p(i + 1, j, k),
                p(i, j, k),
                p(i, j + 1, k),
                p(i + 1, j + 1, k),
            ),
        };

        Face {
            ll,
            lr,
            ur,
            ul,
            block_side,
        }
    }

    /// Corners in emission order.
    pub fn corners(&self) -> [Point3<i32>; 4] {
        [self.ll, self.lr, self.ur, self.ul]
    }

    /// Generates the four vertices of this face.
    ///
    /// The texture's rectangle is mapped so `v1` sits on the lower edge and
    /// `v0` on the upper edge, keeping textures upright on side faces.
    ///
    /// # Arguments
    /// * `uv` - The atlas rectangle of the face's texture
    ///
    /// # Returns
    /// Four vertices in corner order, all carrying the side's light value.
    pub fn vertices(&self, uv: UvRect) -> [Vertex; 4] {
        let light = self.block_side.light();
        [
            Vertex::new(self.ll, uv.u0, uv.v1, light),
            Vertex::new(self.lr, uv.u1, uv.v1, light),
            Vertex::new(self.ur, uv.u1, uv.v0, light),
            Vertex::new(self.ul, uv.u0, uv.v0, light),
        ]
    }
}
