//! Coordinate-keyed chunk storage

use std::collections::HashMap;

use crate::streaming::chunk::{GenerationState, TerrainChunk};
use crate::streaming::coord::ChunkCoord;

/// Every chunk ever created, plus the chunks left visible by the last update.
///
/// Chunks are never removed.
#[derive(Debug, Default)]
pub struct ChunkRegistry {
    chunks: HashMap<ChunkCoord, TerrainChunk>,
    visible_last_update: Vec<ChunkCoord>,
}

impl ChunkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a newly created chunk.
    ///
    /// # Panics
    /// If a chunk already exists at the same coordinate. Creating a chunk
    /// twice means the caller lost track of what it has already created.
    pub fn insert(&mut self, chunk: TerrainChunk) {
        let coord = chunk.coord();
        let previous = self.chunks.insert(coord, chunk);
        assert!(previous.is_none(), "chunk {} created twice", coord);
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<&TerrainChunk> {
        self.chunks.get(&coord)
    }

    pub fn get_mut(&mut self, coord: ChunkCoord) -> Option<&mut TerrainChunk> {
        self.chunks.get_mut(&coord)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TerrainChunk> {
        self.chunks.values()
    }

    /// Number of chunks in a given generation state
    pub fn count_in_state(&self, state: GenerationState) -> usize {
        self.chunks.values().filter(|c| c.state() == state).count()
    }

    /// Chunks shown by the last update, in scan order
    pub fn visible_last_update(&self) -> &[ChunkCoord] {
        &self.visible_last_update
    }

    /// Hide every chunk shown by the last update and forget them
    pub fn hide_visible(&mut self) {
        for coord in self.visible_last_update.drain(..) {
            if let Some(chunk) = self.chunks.get_mut(&coord) {
                chunk.set_visible(false);
            }
        }
    }

    /// Record a chunk as visible for this update
    pub fn mark_visible(&mut self, coord: ChunkCoord) {
        self.visible_last_update.push(coord);
    }
}
