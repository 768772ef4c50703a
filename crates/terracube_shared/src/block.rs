//! # Block Data
//!
//! A block is a type tag plus an `active` flag. Inactive blocks are never
//! meshed and never hide a neighbor's face, whatever their type.

use serde::{Deserialize, Serialize};

/// The closed set of block types.
///
/// Discriminants are stable: they are what the terrain generator writes and
/// what the registry is keyed by.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    /// Placeholder type of a freshly allocated block.
    #[default]
    Default = 0,
    /// Grass: green top, dirt bottom, grassy sides.
    Grass = 1,
    /// Sand.
    Sand = 2,
    /// Dirt.
    Dirt = 3,
    /// Water.
    Water = 4,
    /// Stone.
    Stone = 5,
    /// Wood.
    Wood = 6,
}

impl BlockType {
    /// Every block type, in discriminant order.
    pub const ALL: [Self; 7] = [
        Self::Default,
        Self::Grass,
        Self::Sand,
        Self::Dirt,
        Self::Water,
        Self::Stone,
        Self::Wood,
    ];

    /// Number of block types.
    pub const COUNT: usize = Self::ALL.len();

    /// Returns the raw discriminant.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Looks a type up by its discriminant.
    #[inline]
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Default),
            1 => Some(Self::Grass),
            2 => Some(Self::Sand),
            3 => Some(Self::Dirt),
            4 => Some(Self::Water),
            5 => Some(Self::Stone),
            6 => Some(Self::Wood),
            _ => None,
        }
    }

    /// Lowercase name, as used in config files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Grass => "grass",
            Self::Sand => "sand",
            Self::Dirt => "dirt",
            Self::Water => "water",
            Self::Stone => "stone",
            Self::Wood => "wood",
        }
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single cell of a chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    /// Block type.
    pub block_type: BlockType,
    /// Whether the block is solid (meshed and occluding).
    pub active: bool,
}

impl Block {
    /// Inactive default block - what a chunk is allocated with.
    pub const EMPTY: Self = Self {
        block_type: BlockType::Default,
        active: false,
    };

    /// Creates an active block of the given type.
    #[inline]
    #[must_use]
    pub const fn solid(block_type: BlockType) -> Self {
        Self {
            block_type,
            active: true,
        }
    }

    /// Creates a block with an explicit active flag.
    #[inline]
    #[must_use]
    pub const fn new(block_type: BlockType, active: bool) -> Self {
        Self { block_type, active }
    }

    /// Returns true if this block takes part in meshing.
    #[inline]
    #[must_use]
    pub const fn is_active(self) -> bool {
        self.active
    }
}
