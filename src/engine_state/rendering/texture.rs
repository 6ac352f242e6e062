//! Texture atlas lookups for the mesher.
//!
//! The atlas image itself lives with the renderer. The core only sees a table
//! from texture name to the UV sub-rectangle that texture occupies, and every
//! lookup of an unknown name falls back to the whole atlas.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A UV sub-rectangle of the atlas, `(u0, v0)` to `(u1, v1)`.
///
/// Serialized as `[u0, v0, u1, v1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct UvRect {
    /// Left edge.
    pub u0: f32,
    /// Top edge.
    pub v0: f32,
    /// Right edge.
    pub u1: f32,
    /// Bottom edge.
    pub v1: f32,
}

impl UvRect {
    /// The whole atlas, used for textures missing from the table.
    pub const UNIT: UvRect = UvRect {
        u0: 0.0,
        v0: 0.0,
        u1: 1.0,
        v1: 1.0,
    };

    /// Creates a rectangle from its corners.
    pub const fn new(u0: f32, v0: f32, u1: f32, v1: f32) -> Self {
        UvRect { u0, v0, u1, v1 }
    }
}

impl Default for UvRect {
    fn default() -> Self {
        Self::UNIT
    }
}

impl From<[f32; 4]> for UvRect {
    fn from([u0, v0, u1, v1]: [f32; 4]) -> Self {
        UvRect { u0, v0, u1, v1 }
    }
}

impl From<UvRect> for [f32; 4] {
    fn from(rect: UvRect) -> Self {
        [rect.u0, rect.v0, rect.u1, rect.v1]
    }
}

/// Read-only mapping from texture name to atlas rectangle.
///
/// Deserializes from a JSON object of `name: [u0, v0, u1, v1]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UvTable {
    rects: HashMap<String, UvRect>,
}

impl UvTable {
    /// Creates an empty table; every lookup yields [`UvRect::UNIT`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the rectangle for `name`.
    pub fn insert(&mut self, name: impl Into<String>, rect: UvRect) {
        self.rects.insert(name.into(), rect);
    }

    /// Returns the rectangle for `name`, if present.
    pub fn get(&self, name: &str) -> Option<UvRect> {
        self.rects.get(name).copied()
    }

    /// Returns the rectangle for `name`, or the unit rectangle when missing.
    pub fn get_or_unit(&self, name: &str) -> UvRect {
        self.get(name).unwrap_or(UvRect::UNIT)
    }

    /// Number of named rectangles.
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Returns `true` if no rectangles are present.
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Parses a table from a JSON object.
    pub fn from_json_str(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Lays out square tiles on a grid atlas and returns their rectangles.
    ///
    /// Names are sorted and placed row by row on a `ceil(sqrt(n))`-wide grid of
    /// `tile_size`-pixel tiles. Each rectangle is pulled in by half a texel on
    /// every side so linear sampling never reads the neighboring tile.
    ///
    /// # Arguments
    /// * `names` - Texture names; duplicates collapse to a single tile
    /// * `tile_size` - Edge length of one tile in pixels
    ///
    /// # Returns
    /// The table and the atlas edge length in pixels.
    pub fn from_grid_layout<S: AsRef<str>>(names: &[S], tile_size: u32) -> (Self, u32) {
        let mut sorted: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
        sorted.sort_unstable();
        sorted.dedup();

        let grid = (sorted.len() as f64).sqrt().ceil().max(1.0) as u32;
        let atlas_size = grid * tile_size.max(1);
        let size = atlas_size as f32;
        let pad = 0.5 / size;

        let mut table = UvTable::new();
        for (i, name) in sorted.into_iter().enumerate() {
            let x = (i as u32 % grid) * tile_size;
            let y = (i as u32 / grid) * tile_size;
            table.insert(
                name,
                UvRect::new(
                    x as f32 / size + pad,
                    y as f32 / size + pad,
                    (x + tile_size) as f32 / size - pad,
                    (y + tile_size) as f32 / size - pad,
                ),
            );
        }

        (table, atlas_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_names_fall_back_to_unit_rect() {
        let mut table = UvTable::new();
        table.insert("stone", UvRect::new(0.0, 0.0, 0.5, 0.5));
        assert_eq!(table.get_or_unit("stone"), UvRect::new(0.0, 0.0, 0.5, 0.5));
        assert_eq!(table.get_or_unit("nope"), UvRect::UNIT);
    }

    #[test]
    fn grid_layout_sorts_and_insets() {
        let (table, atlas_size) = UvTable::from_grid_layout(&["sand", "dirt", "stone"], 16);
        assert_eq!(atlas_size, 32);
        assert_eq!(table.len(), 3);

        let pad = 0.5 / 32.0;
        let dirt = table.get_or_unit("dirt");
        assert_eq!(dirt, UvRect::new(pad, pad, 0.5 - pad, 0.5 - pad));
        let sand = table.get_or_unit("sand");
        assert_eq!(sand.u0, 0.5 + pad);
        assert_eq!(sand.v0, pad);
        let stone = table.get_or_unit("stone");
        assert_eq!(stone.u0, pad);
        assert_eq!(stone.v0, 0.5 + pad);
    }

    #[test]
    fn deserializes_from_json_arrays() {
        let table = UvTable::from_json_str(r#"{ "glass": [0.0, 0.25, 0.5, 0.75] }"#).unwrap();
        assert_eq!(table.get("glass"), Some(UvRect::new(0.0, 0.25, 0.5, 0.75)));
    }
}
