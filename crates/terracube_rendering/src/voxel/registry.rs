//! # Block Type Registry
//!
//! Maps each block type to one texture atlas cell per face. Built once at
//! startup and shared read-only by every mesher.
//!
//! ## File format
//!
//! ```toml
//! [blocks.grass]
//! sides = [3, 0]
//! top = [0, 0]
//! bottom = [2, 0]
//!
//! [blocks.stone]
//! all = [1, 0]
//! ```
//!
//! Per-face keys (`front`, `back`, `left`, `right`, `top`, `bottom`) win over
//! `sides`, which wins over `all`. Every face must end up with a cell.

use std::collections::BTreeMap;

use serde::Deserialize;
use terracube_shared::{BlockType, ATLAS_CELLS};

use super::face::Face;
use crate::error::{RenderError, RenderResult};

/// Largest usable atlas column or row.
///
/// Quad corners reference `cell + 1`, which must still fit in five bits.
pub const MAX_ATLAS_CELL: u32 = ATLAS_CELLS - 2;

/// Cell of the texture atlas grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AtlasCell {
    /// Column (u).
    pub column: u32,
    /// Row (v).
    pub row: u32,
}

impl AtlasCell {
    /// Creates a cell.
    #[inline]
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }
}

/// Atlas cells for the six faces of one block type, indexed by face id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaceTextures([AtlasCell; 6]);

impl FaceTextures {
    /// Every face uses the same cell.
    #[must_use]
    pub const fn uniform(cell: AtlasCell) -> Self {
        Self([cell; 6])
    }

    /// Four side faces share a cell; top and bottom have their own.
    #[must_use]
    pub const fn sides_top_bottom(sides: AtlasCell, top: AtlasCell, bottom: AtlasCell) -> Self {
        Self([sides, sides, sides, sides, top, bottom])
    }

    /// Cells in face-id order: front, back, left, right, top, bottom.
    #[must_use]
    pub const fn from_faces(cells: [AtlasCell; 6]) -> Self {
        Self(cells)
    }

    /// Cell for one face.
    #[inline]
    #[must_use]
    pub const fn get(&self, face: Face) -> AtlasCell {
        self.0[face as usize]
    }

    fn validate(&self, block_type: BlockType) -> RenderResult<()> {
        for cell in self.0 {
            if cell.column > MAX_ATLAS_CELL || cell.row > MAX_ATLAS_CELL {
                return Err(RenderError::InvalidAtlasCell {
                    block_type,
                    column: cell.column,
                    row: cell.row,
                    max: MAX_ATLAS_CELL,
                });
            }
        }
        Ok(())
    }
}

/// Block type → per-face atlas cells.
#[derive(Debug, Clone, Default)]
pub struct BlockTypeRegistry {
    entries: [Option<FaceTextures>; BlockType::COUNT],
}

impl BlockTypeRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table for the stock atlas.
    ///
    /// `BlockType::Default` is deliberately absent: an active default block
    /// is a generator bug and fails meshing.
    #[must_use]
    pub fn standard() -> Self {
        let mut entries = [None; BlockType::COUNT];
        let mut set = |ty: BlockType, faces| entries[usize::from(ty.id())] = Some(faces);

        set(
            BlockType::Grass,
            FaceTextures::sides_top_bottom(
                AtlasCell::new(3, 0),
                AtlasCell::new(0, 0),
                AtlasCell::new(2, 0),
            ),
        );
        set(BlockType::Sand, FaceTextures::uniform(AtlasCell::new(0, 11)));
        set(BlockType::Dirt, FaceTextures::uniform(AtlasCell::new(2, 0)));
        set(BlockType::Water, FaceTextures::uniform(AtlasCell::new(13, 12)));
        set(BlockType::Stone, FaceTextures::uniform(AtlasCell::new(1, 0)));
        set(BlockType::Wood, FaceTextures::uniform(AtlasCell::new(4, 0)));

        Self { entries }
    }

    /// Adds or replaces the entry for `block_type`.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::InvalidAtlasCell` if any cell is past
    /// [`MAX_ATLAS_CELL`].
    pub fn register(&mut self, block_type: BlockType, faces: FaceTextures) -> RenderResult<()> {
        faces.validate(block_type)?;
        self.entries[usize::from(block_type.id())] = Some(faces);
        Ok(())
    }

    /// Entry for `block_type`, if registered.
    #[inline]
    #[must_use]
    pub fn faces_for(&self, block_type: BlockType) -> Option<&FaceTextures> {
        self.entries[usize::from(block_type.id())].as_ref()
    }

    /// Entry for `block_type`.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::UnregisteredBlockType` if there is none.
    #[inline]
    pub fn require(&self, block_type: BlockType) -> RenderResult<&FaceTextures> {
        self.faces_for(block_type)
            .ok_or(RenderError::UnregisteredBlockType(block_type))
    }

    /// Whether `block_type` has an entry.
    #[must_use]
    pub fn contains(&self, block_type: BlockType) -> bool {
        self.faces_for(block_type).is_some()
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parses a registry file. Only the listed types are registered.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Toml` on malformed input,
    /// `RenderError::Config` when a face has no cell and
    /// `RenderError::InvalidAtlasCell` for out-of-range cells.
    pub fn from_toml_str(source: &str) -> RenderResult<Self> {
        let file: RegistryFile = toml::from_str(source)?;
        let mut registry = Self::new();
        for (block_type, entry) in file.blocks {
            let faces = entry.resolve(block_type)?;
            registry.register(block_type, faces)?;
        }
        tracing::debug!(types = registry.len(), "block registry loaded");
        Ok(registry)
    }
}

// =============================================================================
// FILE FORMAT
// =============================================================================

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryFile {
    #[serde(default)]
    blocks: BTreeMap<BlockType, FaceSpec>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct FaceSpec {
    all: Option<[u32; 2]>,
    sides: Option<[u32; 2]>,
    front: Option<[u32; 2]>,
    back: Option<[u32; 2]>,
    left: Option<[u32; 2]>,
    right: Option<[u32; 2]>,
    top: Option<[u32; 2]>,
    bottom: Option<[u32; 2]>,
}

impl FaceSpec {
    fn resolve(&self, block_type: BlockType) -> RenderResult<FaceTextures> {
        let side = self.sides.or(self.all);
        let picks = [
            self.front.or(side),
            self.back.or(side),
            self.left.or(side),
            self.right.or(side),
            self.top.or(self.all),
            self.bottom.or(self.all),
        ];

        let mut cells = [AtlasCell::default(); 6];
        for (face, (cell, pick)) in Face::ALL.iter().zip(cells.iter_mut().zip(picks)) {
            let [column, row] = pick.ok_or_else(|| {
                RenderError::Config(format!("`{block_type}` has no atlas cell for {face:?}"))
            })?;
            *cell = AtlasCell::new(column, row);
        }
        Ok(FaceTextures::from_faces(cells))
    }
}
