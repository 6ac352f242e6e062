//! # Modification Log
//!
//! Player edits are recorded by world position so they survive chunk
//! eviction: the world replays the log onto every freshly generated chunk.
//!
//! The log serializes as a flat JSON object from `"x,y,z"` to a block name,
//! with `"air"` marking removed blocks:
//!
//! ```json
//! { "0,70,0": "air", "-3,71,12": "planks" }
//! ```

use std::collections::BTreeMap;

use cgmath::Point3;
use log::warn;
use serde::{Deserialize, Serialize};

use super::{
    block::BlockRegistry,
    chunk::{Chunk, ChunkCoord, ChunkDimensions},
};
use crate::error::Result;

/// World-position keyed record of block edits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModificationLog {
    entries: BTreeMap<String, String>,
}

/// Formats a world position as a log key.
pub fn position_key(position: Point3<i32>) -> String {
    format!("{},{},{}", position.x, position.y, position.z)
}

/// Parses a `"x,y,z"` log key.
pub fn parse_position_key(key: &str) -> Option<Point3<i32>> {
    let mut parts = key.split(',').map(|part| part.trim().parse::<i32>());
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(Ok(x)), Some(Ok(y)), Some(Ok(z)), None) => Some(Point3::new(x, y, z)),
        _ => None,
    }
}

impl ModificationLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that the block at `position` is now `block_name`, replacing any
    /// earlier edit of that position.
    pub fn record(&mut self, position: Point3<i32>, block_name: &str) {
        self.entries.insert(position_key(position), block_name.to_string());
    }

    /// The recorded block name at `position`.
    pub fn get(&self, position: Point3<i32>) -> Option<&str> {
        self.entries.get(&position_key(position)).map(String::as_str)
    }

    /// Number of recorded positions, malformed keys included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the well-formed entries.
    pub fn iter(&self) -> impl Iterator<Item = (Point3<i32>, &str)> {
        self.entries
            .iter()
            .filter_map(|(key, name)| parse_position_key(key).map(|pos| (pos, name.as_str())))
    }

    /// Entries whose position falls inside chunk `coord`.
    pub fn entries_in_chunk(
        &self,
        coord: ChunkCoord,
        dimensions: ChunkDimensions,
    ) -> Vec<(Point3<i32>, &str)> {
        self.iter()
            .filter(|(position, _)| ChunkCoord::containing(position.x, position.z, dimensions) == coord)
            .collect()
    }

    /// Copies every entry of `other` into this log; `other` wins on conflicts.
    pub fn merge(&mut self, other: &ModificationLog) {
        self.entries
            .extend(other.entries.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Writes the recorded edits that fall inside `chunk` into it.
    ///
    /// Malformed keys and unknown block names are skipped with a warning.
    /// Positions outside the chunk, height range included, are ignored.
    ///
    /// # Returns
    /// The number of blocks written.
    pub fn replay_onto(&self, chunk: &mut Chunk, registry: &BlockRegistry) -> usize {
        let mut applied = 0;
        for (key, name) in &self.entries {
            let Some(position) = parse_position_key(key) else {
                warn!("Skipping malformed modification key '{}'", key);
                continue;
            };
            let Some(local) = chunk.local_position(position) else {
                continue;
            };
            let Some(id) = registry.id_of(name) else {
                warn!("Skipping modification at {}: unknown block '{}'", key, name);
                continue;
            };
            if chunk.set_block(local.x, local.y, local.z, id) {
                applied += 1;
            }
        }
        applied
    }

    /// Serializes the log as a JSON object.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a log from a JSON object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
