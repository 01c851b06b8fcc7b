//! # Chunk System
//!
//! World data is organized into 16 x 256 x 16 columns of blocks.
//!
//! ## Chunk Format
//!
//! A chunk stores only occupied cells, keyed by their local position.
//! A local position absent from the map is air. Chunks never reference each
//! other; neighbour lookups always go back through the world.
//!
//! ## Addressing
//!
//! World X/Z map to chunk coordinates with floor division (`div_euclid`) and
//! to local coordinates with `rem_euclid`, so world x = -1 lives in chunk -1
//! at local x = 15.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::block::{BlockPos, BlockType};

/// Chunk width/depth in blocks.
pub const CHUNK_SIZE: i32 = 16;

/// World height in blocks. Valid Y is `0..WORLD_HEIGHT`.
pub const WORLD_HEIGHT: i32 = 256;

/// Highest valid Y; height queries scan down from here.
pub const WORLD_CEILING: i32 = WORLD_HEIGHT - 1;

/// Lowest chunk X/Z holding addressable blocks.
pub const MIN_CHUNK: i32 = i32::MIN / CHUNK_SIZE;

/// Highest chunk X/Z holding addressable blocks.
pub const MAX_CHUNK: i32 = i32::MAX / CHUNK_SIZE;

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not blocks).
    pub x: i32,
    /// Z coordinate (in chunks, not blocks).
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Converts world block coordinates to chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn from_block_pos(block_x: i32, block_z: i32) -> Self {
        Self {
            x: block_x.div_euclid(CHUNK_SIZE),
            z: block_z.div_euclid(CHUNK_SIZE),
        }
    }

    /// Converts a floating-point world position (observer) to its chunk.
    ///
    /// Positions beyond the block grid clamp to the outermost chunk.
    ///
    /// # Panics
    ///
    /// Panics if `x` or `z` is not finite.
    #[must_use]
    pub fn from_world_f64(x: f64, z: f64) -> Self {
        assert!(
            x.is_finite() && z.is_finite(),
            "non-finite observer position ({x}, {z})"
        );
        let size = f64::from(CHUNK_SIZE);
        let to_chunk =
            |v: f64| (v / size).floor().clamp(f64::from(MIN_CHUNK), f64::from(MAX_CHUNK)) as i32;
        Self {
            x: to_chunk(x),
            z: to_chunk(z),
        }
    }

    /// Returns true if the chunk lies inside the block grid.
    #[inline]
    #[must_use]
    pub fn is_addressable(self) -> bool {
        let grid = MIN_CHUNK..=MAX_CHUNK;
        grid.contains(&self.x) && grid.contains(&self.z)
    }

    /// Returns this coordinate shifted by whole chunks, or `None` if the
    /// result leaves the block grid.
    #[inline]
    #[must_use]
    pub fn offset(self, dx: i32, dz: i32) -> Option<Self> {
        let coord = Self::new(self.x.checked_add(dx)?, self.z.checked_add(dz)?);
        coord.is_addressable().then_some(coord)
    }

    /// Returns the world X coordinate of the chunk's origin (corner).
    #[inline]
    #[must_use]
    pub const fn world_x(self) -> i32 {
        self.x.saturating_mul(CHUNK_SIZE)
    }

    /// Returns the world Z coordinate of the chunk's origin.
    #[inline]
    #[must_use]
    pub const fn world_z(self) -> i32 {
        self.z.saturating_mul(CHUNK_SIZE)
    }

    /// Chebyshev (chessboard) distance in chunks.
    #[inline]
    #[must_use]
    pub fn chebyshev_distance(self, other: Self) -> i32 {
        let distance = self.x.abs_diff(other.x).max(self.z.abs_diff(other.z));
        i32::try_from(distance).unwrap_or(i32::MAX)
    }
}

/// Position of a cell inside a chunk.
///
/// X and Z are in `0..CHUNK_SIZE`; Y spans the whole world height, which fits
/// a `u8` exactly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocalPos {
    /// Local X (0-15).
    pub x: u8,
    /// Y level (0-255).
    pub y: u8,
    /// Local Z (0-15).
    pub z: u8,
}

impl LocalPos {
    /// Creates a local position. Out-of-range X/Z are caught by [`Self::is_valid`].
    #[inline]
    #[must_use]
    pub const fn new(x: u8, y: u8, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Returns true if X and Z fall inside a chunk.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        (self.x as i32) < CHUNK_SIZE && (self.z as i32) < CHUNK_SIZE
    }

    /// Splits a world position into chunk and local parts.
    ///
    /// Returns `None` when Y is outside the world.
    #[must_use]
    pub fn split(pos: BlockPos) -> Option<(ChunkCoord, Self)> {
        if !(0..WORLD_HEIGHT).contains(&pos.y) {
            return None;
        }
        let coord = ChunkCoord::from_block_pos(pos.x, pos.z);
        let local = Self {
            x: pos.x.rem_euclid(CHUNK_SIZE) as u8,
            y: pos.y as u8,
            z: pos.z.rem_euclid(CHUNK_SIZE) as u8,
        };
        Some((coord, local))
    }

    /// Converts back to a world position inside `coord`.
    #[inline]
    #[must_use]
    pub const fn to_world(self, coord: ChunkCoord) -> BlockPos {
        BlockPos::new(
            coord.world_x().saturating_add(self.x as i32),
            self.y as i32,
            coord.world_z().saturating_add(self.z as i32),
        )
    }
}

/// A chunk of world data.
///
/// Sparse: only occupied cells are stored.
#[derive(Clone, Debug)]
pub struct Chunk {
    /// Chunk position in the world.
    pub coord: ChunkCoord,
    /// Occupied cells.
    blocks: HashMap<LocalPos, BlockType>,
    /// Whether mesh/visibility data must be rebuilt.
    dirty: bool,
}

impl Chunk {
    /// Creates a new empty chunk at the given coordinates.
    ///
    /// New chunks start dirty so the renderer picks them up.
    #[must_use]
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            blocks: HashMap::new(),
            dirty: true,
        }
    }

    /// Gets the block at local coordinates.
    #[inline]
    #[must_use]
    pub fn get(&self, local: LocalPos) -> Option<BlockType> {
        self.blocks.get(&local).copied()
    }

    /// Sets a block, replacing whatever was there.
    ///
    /// Returns the previous block.
    pub fn set(&mut self, local: LocalPos, block: BlockType) -> Option<BlockType> {
        debug_assert!(local.is_valid(), "local position {local:?} outside chunk");
        self.dirty = true;
        self.blocks.insert(local, block)
    }

    /// Removes a block. Only marks the chunk dirty if a block was present.
    pub fn remove(&mut self, local: LocalPos) -> Option<BlockType> {
        let removed = self.blocks.remove(&local);
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    /// Returns true if the cell is air.
    #[inline]
    #[must_use]
    pub fn is_air(&self, local: LocalPos) -> bool {
        !self.blocks.contains_key(&local)
    }

    /// Iterates over all occupied cells, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (LocalPos, BlockType)> + '_ {
        self.blocks.iter().map(|(pos, block)| (*pos, *block))
    }

    /// Returns occupied cells sorted by (x, y, z).
    #[must_use]
    pub fn sorted_blocks(&self) -> Vec<(LocalPos, BlockType)> {
        let mut blocks: Vec<_> = self.iter().collect();
        blocks.sort_unstable_by_key(|(pos, _)| *pos);
        blocks
    }

    /// Number of occupied cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns true if the chunk holds no blocks.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Highest occupied Y in a local column, scanning down from the ceiling.
    #[must_use]
    pub fn column_top(&self, x: u8, z: u8) -> Option<u8> {
        (0..=WORLD_CEILING as u8)
            .rev()
            .find(|&y| self.blocks.contains_key(&LocalPos::new(x, y, z)))
    }

    /// Local bounds of all occupied cells.
    ///
    /// `max` is exclusive: a block occupies the unit cube from its integer
    /// corner, so the box is expanded by one on the max side. Returns `None`
    /// for an empty chunk.
    #[must_use]
    pub fn local_bounds(&self) -> Option<([i32; 3], [i32; 3])> {
        let mut cells = self.blocks.keys();
        let first = cells.next()?;
        let mut min = [i32::from(first.x), i32::from(first.y), i32::from(first.z)];
        let mut max = min;
        for pos in cells {
            let p = [i32::from(pos.x), i32::from(pos.y), i32::from(pos.z)];
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
        Some((min, [max[0] + 1, max[1] + 1, max[2] + 1]))
    }

    /// Returns whether the chunk needs re-meshing.
    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clears the dirty flag, returning its previous value.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Sets the dirty flag.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_coord_from_block() {
        assert_eq!(ChunkCoord::from_block_pos(0, 0), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_block_pos(15, 15), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_block_pos(16, 16), ChunkCoord::new(1, 1));
        assert_eq!(ChunkCoord::from_block_pos(-1, -1), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_block_pos(-16, -16), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_block_pos(-17, -17), ChunkCoord::new(-2, -2));
    }

    #[test]
    fn test_observer_coord_floors() {
        assert_eq!(ChunkCoord::from_world_f64(0.5, 0.5), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_world_f64(-0.5, 15.99), ChunkCoord::new(-1, 0));
        assert_eq!(ChunkCoord::from_world_f64(-16.0, 16.0), ChunkCoord::new(-1, 1));
    }

    #[test]
    fn test_split_negative_positions() {
        let (coord, local) = LocalPos::split(BlockPos::new(-1, 10, -16)).unwrap();
        assert_eq!(coord, ChunkCoord::new(-1, -1));
        assert_eq!(local, LocalPos::new(15, 10, 0));
        assert_eq!(local.to_world(coord), BlockPos::new(-1, 10, -16));
    }

    #[test]
    fn test_split_rejects_out_of_world_y() {
        assert!(LocalPos::split(BlockPos::new(0, -1, 0)).is_none());
        assert!(LocalPos::split(BlockPos::new(0, WORLD_HEIGHT, 0)).is_none());
        assert!(LocalPos::split(BlockPos::new(0, WORLD_CEILING, 0)).is_some());
    }

    #[test]
    fn test_chebyshev_distance() {
        let origin = ChunkCoord::new(0, 0);
        assert_eq!(origin.chebyshev_distance(ChunkCoord::new(2, -1)), 2);
        assert_eq!(origin.chebyshev_distance(ChunkCoord::new(-3, 3)), 3);
        assert_eq!(origin.chebyshev_distance(origin), 0);
        let edge = ChunkCoord::new(MAX_CHUNK, 0);
        assert_eq!(ChunkCoord::new(MIN_CHUNK, 0).chebyshev_distance(edge), 268_435_455);
        let outside = ChunkCoord::new(i32::MIN, 0);
        assert_eq!(outside.chebyshev_distance(ChunkCoord::new(i32::MAX, 0)), i32::MAX);
    }

    #[test]
    fn test_far_observer_clamps_to_grid() {
        assert_eq!(ChunkCoord::from_world_f64(1.0e10, 8.0), ChunkCoord::new(MAX_CHUNK, 0));
        assert_eq!(
            ChunkCoord::from_world_f64(-1.0e10, -1.0e12),
            ChunkCoord::new(MIN_CHUNK, MIN_CHUNK)
        );

        let edge = ChunkCoord::new(MAX_CHUNK, MIN_CHUNK);
        assert_eq!(edge.world_x(), i32::MAX - 15);
        assert_eq!(edge.world_z(), i32::MIN);
        assert_eq!(LocalPos::new(15, 0, 0).to_world(edge), BlockPos::new(i32::MAX, 0, i32::MIN));
        assert!(edge.offset(1, 0).is_none());
        assert!(edge.offset(0, -1).is_none());
        assert_eq!(edge.offset(-1, 1), Some(ChunkCoord::new(MAX_CHUNK - 1, MIN_CHUNK + 1)));
    }

    #[test]
    fn test_set_overwrites_and_marks_dirty() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        chunk.take_dirty();
        let pos = LocalPos::new(1, 2, 3);

        assert_eq!(chunk.set(pos, BlockType::Stone), None);
        assert!(chunk.is_dirty());
        assert_eq!(chunk.set(pos, BlockType::Dirt), Some(BlockType::Stone));
        assert_eq!(chunk.get(pos), Some(BlockType::Dirt));
        assert_eq!(chunk.len(), 1);
    }

    #[test]
    fn test_remove_missing_keeps_clean() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        chunk.take_dirty();
        assert_eq!(chunk.remove(LocalPos::new(0, 0, 0)), None);
        assert!(!chunk.is_dirty());
    }

    #[test]
    fn test_local_bounds() {
        let mut chunk = Chunk::new(ChunkCoord::new(3, -2));
        assert!(chunk.local_bounds().is_none());

        chunk.set(LocalPos::new(2, 5, 7), BlockType::Stone);
        chunk.set(LocalPos::new(10, 1, 3), BlockType::Grass);
        assert_eq!(chunk.local_bounds(), Some(([2, 1, 3], [11, 6, 8])));
    }

    #[test]
    fn test_column_top() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        assert_eq!(chunk.column_top(4, 4), None);
        chunk.set(LocalPos::new(4, 3, 4), BlockType::Dirt);
        chunk.set(LocalPos::new(4, 200, 4), BlockType::Leaves);
        assert_eq!(chunk.column_top(4, 4), Some(200));
        assert_eq!(chunk.column_top(4, 5), None);
    }
}
