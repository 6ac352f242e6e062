//! # Chunk Iteration Module
//!
//! An iterator over the non-air cells of a chunk, in storage order (x, then y,
//! then z innermost). The mesher and the tests walk chunks through it.

use cgmath::Point3;

use crate::engine_state::voxels::block::{BlockId, AIR_ID};

use super::Chunk;

/// Iterates over every non-air block in a chunk together with its
/// chunk-local position.
pub struct ChunkBlockIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk,
    /// Next flat index to inspect
    current_offset: usize,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates a new `ChunkBlockIterator` for the given chunk.
    ///
    /// # Arguments
    /// * `chunk_ref` - A reference to the chunk to iterate over
    ///
    /// # Returns
    /// A new `ChunkBlockIterator` positioned before the first cell
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        ChunkBlockIterator {
            chunk_ref,
            current_offset: 0,
        }
    }
}

impl Iterator for ChunkBlockIterator<'_> {
    type Item = (Point3<i32>, BlockId);

    fn next(&mut self) -> Option<Self::Item> {
        let blocks = self.chunk_ref.raw_blocks();
        while self.current_offset < blocks.len() {
            let offset = self.current_offset;
            self.current_offset += 1;

            let id = blocks[offset];
            if id != AIR_ID {
                let position = self.chunk_ref.dimensions().position_of(offset);
                return Some((position, id));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.chunk_ref.raw_blocks().len() - self.current_offset;
        (0, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::{ChunkCoord, ChunkDimensions};

    #[test]
    fn skips_air_and_yields_in_storage_order() {
        let mut chunk = Chunk::empty(ChunkCoord::new(0, 0), ChunkDimensions::new(4, 4, 4));
        chunk.set_block(2, 0, 0, 5);
        chunk.set_block(0, 3, 1, 2);
        chunk.set_block(0, 0, 3, 1);

        let found: Vec<_> = chunk.iter_blocks().collect();
        assert_eq!(
            found,
            vec![
                (Point3::new(0, 0, 3), 1),
                (Point3::new(0, 3, 1), 2),
                (Point3::new(2, 0, 0), 5),
            ]
        );
    }

    #[test]
    fn empty_chunk_yields_nothing() {
        let chunk = Chunk::empty(ChunkCoord::new(0, 0), ChunkDimensions::new(2, 2, 2));
        assert_eq!(chunk.iter_blocks().count(), 0);
    }
}
