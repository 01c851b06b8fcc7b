//! # Fluid Simulation
//!
//! Water is re-evaluated one queue generation per tick.
//!
//! ## Rules
//!
//! For every queued position that still holds water:
//!
//! - If the cell below is open, the water **moves** down (source removed,
//!   target added). Block count is conserved.
//! - Otherwise it **spreads** into every open horizontal neighbour, checked in
//!   the fixed order +X, -X, +Z, -Z. The source stays, so spreading creates
//!   water. This is intentional.
//! - If nothing is open the position settles and leaves the queue until a
//!   write touches it again.
//!
//! A cell is open when its chunk is loaded, its Y is inside the world, and it
//! holds no block. Water never leaves the loaded world.
//!
//! ## Double Buffering
//!
//! The queue is swapped out before iteration. Every water write during the
//! tick lands in the fresh queue and is handled next tick.

use std::collections::HashSet;

use crate::block::{BlockPos, BlockType};
use crate::world::World;

/// Horizontal spread order.
const SPREAD_ORDER: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Insertion-ordered set of positions awaiting a fluid update.
#[derive(Clone, Debug, Default)]
pub struct FluidQueue {
    order: Vec<BlockPos>,
    members: HashSet<BlockPos>,
}

impl FluidQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `pos` unless already queued. Returns true if it was added.
    pub fn push(&mut self, pos: BlockPos) -> bool {
        if self.members.insert(pos) {
            self.order.push(pos);
            true
        } else {
            false
        }
    }

    /// Returns true if `pos` is queued.
    #[must_use]
    pub fn contains(&self, pos: BlockPos) -> bool {
        self.members.contains(&pos)
    }

    /// Number of queued positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = BlockPos> + '_ {
        self.order.iter().copied()
    }

    /// Keeps only positions matching `keep`, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(BlockPos) -> bool) {
        let members = &mut self.members;
        self.order.retain(|pos| {
            let kept = keep(*pos);
            if !kept {
                members.remove(pos);
            }
            kept
        });
    }

    /// Empties the queue.
    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }
}

impl Extend<BlockPos> for FluidQueue {
    fn extend<I: IntoIterator<Item = BlockPos>>(&mut self, iter: I) {
        for pos in iter {
            self.push(pos);
        }
    }
}

impl IntoIterator for FluidQueue {
    type Item = BlockPos;
    type IntoIter = std::vec::IntoIter<BlockPos>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.into_iter()
    }
}

/// What happened during one fluid update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FluidTickStats {
    /// Queue entries drained this tick.
    pub processed: usize,
    /// Water blocks that fell one cell.
    pub moved_down: usize,
    /// Water cells created by horizontal spread.
    pub spread: usize,
    /// Water blocks with nowhere to go, dropped from the queue.
    pub settled: usize,
    /// Entries whose cell no longer held water.
    pub stale: usize,
}

impl FluidTickStats {
    /// Adds another tick's counts to this one.
    pub fn accumulate(&mut self, other: &Self) {
        self.processed += other.processed;
        self.moved_down += other.moved_down;
        self.spread += other.spread;
        self.settled += other.settled;
        self.stale += other.stale;
    }
}

/// Drives fluid updates and keeps lifetime totals.
#[derive(Clone, Debug, Default)]
pub struct FluidSimulator {
    ticks: u64,
    totals: FluidTickStats,
}

impl FluidSimulator {
    /// Creates a simulator with zeroed totals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one fluid tick over `world`.
    pub fn update(&mut self, world: &mut World) -> FluidTickStats {
        let pending = world.take_fluid_queue();
        let mut stats = FluidTickStats {
            processed: pending.len(),
            ..FluidTickStats::default()
        };

        for pos in pending {
            if world.get_block(pos) != Some(BlockType::Water) {
                stats.stale += 1;
                continue;
            }
            match flow(world, pos) {
                Flow::Down => stats.moved_down += 1,
                Flow::Spread(cells) => stats.spread += cells,
                Flow::Settled => stats.settled += 1,
            }
        }

        self.ticks += 1;
        self.totals.accumulate(&stats);
        if stats.processed > 0 {
            tracing::trace!(
                "fluid tick {}: {} processed, {} fell, {} spread, {} settled, {} stale",
                self.ticks,
                stats.processed,
                stats.moved_down,
                stats.spread,
                stats.settled,
                stats.stale
            );
        }
        stats
    }

    /// Number of ticks run.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Sum of every tick's stats.
    #[must_use]
    pub const fn totals(&self) -> &FluidTickStats {
        &self.totals
    }
}

/// Outcome of flowing one water block.
enum Flow {
    Down,
    Spread(usize),
    Settled,
}

/// Flows the water at `pos`. Writes go through the world's block API, which
/// queues the new water cells for the next tick.
fn flow(world: &mut World, pos: BlockPos) -> Flow {
    if let Some(below) = pos.offset(0, -1, 0).filter(|below| world.is_open(*below)) {
        world.remove_block(pos);
        world.add_block(below, BlockType::Water);
        return Flow::Down;
    }

    let mut spread = 0;
    for (dx, dz) in SPREAD_ORDER {
        let Some(side) = pos.offset(dx, 0, dz) else {
            continue;
        };
        if world.is_open(side) {
            world.add_block(side, BlockType::Water);
            spread += 1;
        }
    }
    if spread == 0 {
        Flow::Settled
    } else {
        Flow::Spread(spread)
    }
}
