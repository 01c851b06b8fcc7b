//! # Block Types
//!
//! A block is nothing more than a type tag sitting at an integer lattice
//! position. The position is implicit (it is the key in a chunk's block map),
//! so `BlockType` carries no per-instance data at all.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Every block type the world knows about.
///
/// Air is not a variant: an absent cell *is* air.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BlockType {
    /// Surface block of fertile columns. Trees only grow on grass.
    Grass = 1,
    /// The three layers below the surface.
    Dirt = 2,
    /// Bulk terrain.
    Stone = 3,
    /// Tree trunks.
    Wood = 4,
    /// Tree canopies.
    Leaves = 5,
    /// Surface block of dry columns.
    Sand = 6,
    /// The only fluid. Tracked by the fluid queue.
    Water = 7,
    /// Most common ore.
    CoalOre = 8,
    /// Second most common ore.
    IronOre = 9,
    /// Rare ore.
    GoldOre = 10,
    /// Rarest ore.
    DiamondOre = 11,
}

impl BlockType {
    /// All block types, in id order.
    pub const ALL: [Self; 11] = [
        Self::Grass,
        Self::Dirt,
        Self::Stone,
        Self::Wood,
        Self::Leaves,
        Self::Sand,
        Self::Water,
        Self::CoalOre,
        Self::IronOre,
        Self::GoldOre,
        Self::DiamondOre,
    ];

    /// Returns the stable numeric id.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Converts from a numeric id.
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::Grass),
            2 => Some(Self::Dirt),
            3 => Some(Self::Stone),
            4 => Some(Self::Wood),
            5 => Some(Self::Leaves),
            6 => Some(Self::Sand),
            7 => Some(Self::Water),
            8 => Some(Self::CoalOre),
            9 => Some(Self::IronOre),
            10 => Some(Self::GoldOre),
            11 => Some(Self::DiamondOre),
            _ => None,
        }
    }

    /// Returns the lowercase name used in configs and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Grass => "grass",
            Self::Dirt => "dirt",
            Self::Stone => "stone",
            Self::Wood => "wood",
            Self::Leaves => "leaves",
            Self::Sand => "sand",
            Self::Water => "water",
            Self::CoalOre => "coal_ore",
            Self::IronOre => "iron_ore",
            Self::GoldOre => "gold_ore",
            Self::DiamondOre => "diamond_ore",
        }
    }

    /// Returns true for blocks that flow.
    #[inline]
    #[must_use]
    pub const fn is_fluid(self) -> bool {
        matches!(self, Self::Water)
    }

    /// Returns true for blocks a body cannot pass through.
    #[inline]
    #[must_use]
    pub const fn is_solid(self) -> bool {
        !self.is_fluid()
    }

    /// Returns true for the four ore kinds.
    #[must_use]
    pub const fn is_ore(self) -> bool {
        matches!(
            self,
            Self::CoalOre | Self::IronOre | Self::GoldOre | Self::DiamondOre
        )
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlockType {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|block| block.name() == s)
            .ok_or_else(|| WorldError::UnknownBlockType(s.to_owned()))
    }
}

/// Integer position of a block in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    /// World X.
    pub x: i32,
    /// World Y (height).
    pub y: i32,
    /// World Z.
    pub z: i32,
}

impl BlockPos {
    /// Creates a new block position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns this position shifted by the given deltas, or `None` if a
    /// component leaves the `i32` range.
    #[inline]
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
            z: self.z.checked_add(dz)?,
        })
    }

    /// Truncates a float position toward zero, component-wise.
    ///
    /// # Panics
    ///
    /// Panics if any component is NaN or infinite.
    #[must_use]
    pub fn from_world_f64(pos: [f64; 3]) -> Self {
        assert!(
            pos.iter().all(|c| c.is_finite()),
            "non-finite world position {pos:?}"
        );
        Self {
            x: pos[0] as i32,
            y: pos[1] as i32,
            z: pos[2] as i32,
        }
    }
}

impl From<(i32, i32, i32)> for BlockPos {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip_covers_every_type() {
        for block in BlockType::ALL {
            assert_eq!(BlockType::from_id(block.id()), Some(block));
        }
        assert_eq!(BlockType::from_id(0), None);
        assert_eq!(BlockType::from_id(12), None);
    }

    #[test]
    fn test_names_parse_back() {
        assert_eq!("diamond_ore".parse::<BlockType>().unwrap(), BlockType::DiamondOre);
        assert_eq!("grass".parse::<BlockType>().unwrap(), BlockType::Grass);
        assert!("bedrock".parse::<BlockType>().is_err());
    }

    #[test]
    fn test_only_water_is_fluid() {
        let fluids: Vec<_> = BlockType::ALL.iter().filter(|b| b.is_fluid()).collect();
        assert_eq!(fluids, vec![&BlockType::Water]);
        assert!(BlockType::Stone.is_solid());
        assert!(!BlockType::Water.is_solid());
    }

    #[test]
    fn test_from_world_truncates_toward_zero() {
        assert_eq!(BlockPos::from_world_f64([1.9, 2.1, -0.5]), BlockPos::new(1, 2, 0));
        assert_eq!(BlockPos::from_world_f64([-1.5, 0.0, 3.99]), BlockPos::new(-1, 0, 3));
    }

    #[test]
    #[should_panic(expected = "non-finite")]
    fn test_from_world_rejects_nan() {
        let _ = BlockPos::from_world_f64([f64::NAN, 0.0, 0.0]);
    }
}
