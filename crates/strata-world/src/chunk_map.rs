use crate::chunk::Chunk;
use crate::occupancy::OccupancyIndex;
use std::collections::HashMap;
use strata_common::{ChunkPos, Direction};

/// Loaded chunks keyed by their packed position.
#[derive(Debug, Default)]
pub struct ChunkMap {
    chunks: HashMap<u64, Chunk>,
}

impl ChunkMap {
    pub fn new() -> ChunkMap {
        ChunkMap {
            chunks: HashMap::new(),
        }
    }

    /// Inserts a chunk at its own position, returning whatever was loaded
    /// there before.
    pub fn insert(&mut self, chunk: Chunk) -> Option<Chunk> {
        self.chunks.insert(chunk.key(), chunk)
    }

    pub fn get(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos.pack())
    }

    pub fn get_mut(&mut self, pos: ChunkPos) -> Option<&mut Chunk> {
        self.chunks.get_mut(&pos.pack())
    }

    pub fn remove(&mut self, pos: ChunkPos) -> Option<Chunk> {
        self.chunks.remove(&pos.pack())
    }

    pub fn contains(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos.pack())
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn neighbor(&self, pos: ChunkPos, direction: Direction) -> Option<&Chunk> {
        self.get(pos.offset(direction))
    }

    /// Gate for mesh computation: all six face-adjacent chunks are loaded.
    pub fn has_neighbors_on_all_sides(&self, pos: ChunkPos) -> bool {
        Direction::ALL
            .iter()
            .all(|&direction| self.contains(pos.offset(direction)))
    }

    /// The six neighbor occupancy indices in direction order, `None` where
    /// the neighbor is not loaded. The culler refuses to run on a `None`.
    pub fn neighbor_occupancies(&self, pos: ChunkPos) -> [Option<&OccupancyIndex>; 6] {
        Direction::ALL.map(|direction| self.neighbor(pos, direction).map(Chunk::occupancy))
    }
}
