//! Tree species and their trunk/canopy placement.
//!
//! Species are immutable values; the behaviour that differs between them is
//! picked from a small strategy table keyed by [`Variant`]. Oak and jungle
//! are plain [`Variant::Generic`] trees with different blocks.

use skyblock_world::{Axis, Block, BlockAccess, BlockPos, WoodType, WorldError};
use thiserror::Error;

use crate::random::RandomSource;

pub mod canopy;
pub mod trunk;


/// Default vertical extent of every stock species.
pub const DEFAULT_CANOPY_HEIGHT: i32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Generic,
    Birch { super_birch: bool },
    Spruce,
}

type TrunkHeightFn = fn(&TreeSpecies, &mut dyn RandomSource) -> i32;
type CanopyFn = fn(&TreeSpecies, BlockPos, &mut dyn RandomSource, &mut dyn BlockAccess) -> Result<(), WorldError>;

/// Per-variant generation behaviour.
struct Strategy {
    trunk_height: TrunkHeightFn,
    place_canopy: CanopyFn,
}

static GENERIC: Strategy = Strategy {
    trunk_height: trunk::fixed_height,
    place_canopy: canopy::place_blob,
};

static SPRUCE: Strategy = Strategy {
    trunk_height: trunk::spruce_height,
    place_canopy: canopy::place_spruce,
};

impl Variant {
    fn strategy(self) -> &'static Strategy {
        match self {
            Variant::Generic | Variant::Birch { .. } => &GENERIC,
            Variant::Spruce => &SPRUCE,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpeciesError {
    #[error("tree species needs a name")]
    EmptyName,
    #[error("canopy height must be at least 1, got {0}")]
    CanopyHeight(i32),
    #[error("tree species {0} uses air as trunk or leaf block")]
    AirBlock(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSpecies {
    name: String,
    trunk_block: Block,
    leaf_block: Block,
    canopy_height: i32,
    variant: Variant,
}

impl TreeSpecies {
    pub fn new(
        name: impl Into<String>,
        trunk_block: Block,
        leaf_block: Block,
        canopy_height: i32,
        variant: Variant,
    ) -> Result<Self, SpeciesError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SpeciesError::EmptyName);
        }
        if canopy_height < 1 {
            return Err(SpeciesError::CanopyHeight(canopy_height));
        }
        if trunk_block.is_air() || leaf_block.is_air() {
            return Err(SpeciesError::AirBlock(name));
        }
        Ok(Self { name, trunk_block, leaf_block, canopy_height, variant })
    }

    // Stock species are known-valid, so they skip validation.
    fn stock(name: &str, wood: WoodType, persistent_leaves: bool, variant: Variant) -> Self {
        Self {
            name: name.to_string(),
            trunk_block: Block::Wood { wood, stripped: false, axis: Axis::Y },
            leaf_block: Block::Leaves { wood, persistent: persistent_leaves, should_update: true },
            canopy_height: DEFAULT_CANOPY_HEIGHT,
            variant,
        }
    }

    pub fn oak() -> Self {
        Self::stock("Oak Tree", WoodType::Oak, true, Variant::Generic)
    }

    pub fn birch(super_birch: bool) -> Self {
        Self::stock("Birch Tree", WoodType::Birch, true, Variant::Birch { super_birch })
    }

    pub fn spruce() -> Self {
        Self::stock("Spruce Tree", WoodType::Spruce, true, Variant::Spruce)
    }

    pub fn jungle() -> Self {
        Self::stock("Jungle Tree", WoodType::Jungle, false, Variant::Generic)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn trunk_block(&self) -> Block {
        self.trunk_block
    }

    pub fn leaf_block(&self) -> Block {
        self.leaf_block
    }

    pub fn canopy_height(&self) -> i32 {
        self.canopy_height
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Whether placement may replace `block`. Only existing wood and leaves
    /// qualify; air and terrain do not.
    pub fn can_override(&self, block: Block) -> bool {
        matches!(block, Block::Wood { .. } | Block::Leaves { .. })
    }

    /// Cells checked by [`TreeSpecies::can_place`]: one square per layer from
    /// `pos.y` up to `pos.y + canopy_height`, radius 0 at the base, 1 from the
    /// second layer and 2 on the last one.
    pub fn footprint(&self, pos: BlockPos) -> Vec<BlockPos> {
        let mut cells = Vec::new();
        let mut radius = 0;
        for yy in 0..self.canopy_height {
            if yy == 1 || yy == self.canopy_height - 1 {
                radius += 1;
            }
            for xx in -radius..=radius {
                for zz in -radius..=radius {
                    cells.push(pos.offset(xx, yy, zz));
                }
            }
        }
        cells
    }

    /// False as soon as one footprint cell cannot be overridden. A failed
    /// read counts as an obstruction.
    ///
    /// [`TreeSpecies::place_tree`] does not consult this check.
    pub fn can_place(&self, world: &mut dyn BlockAccess, pos: BlockPos) -> bool {
        for cell in self.footprint(pos) {
            match world.block(cell) {
                Ok(block) if self.can_override(block) => {}
                Ok(_) => return false,
                Err(e) => {
                    log::warn!("Cannot inspect {} for {}: {}", cell, self.name, e);
                    return false;
                }
            }
        }
        true
    }

    pub fn generate_trunk_height(&self, rng: &mut dyn RandomSource) -> i32 {
        (self.variant.strategy().trunk_height)(self, rng)
    }

    pub fn place_trunk(&self, pos: BlockPos, trunk_height: i32, world: &mut dyn BlockAccess) -> Result<(), WorldError> {
        trunk::place(self, pos, trunk_height, world)
    }

    pub fn place_canopy(
        &self,
        pos: BlockPos,
        rng: &mut dyn RandomSource,
        world: &mut dyn BlockAccess,
    ) -> Result<(), WorldError> {
        (self.variant.strategy().place_canopy)(self, pos, rng, world)
    }

    /// Trunk height, trunk, then canopy, all drawing from the same `rng`.
    /// Obstructions are not checked; the first failed write is returned.
    pub fn place_tree(
        &self,
        world: &mut dyn BlockAccess,
        pos: BlockPos,
        rng: &mut dyn RandomSource,
    ) -> Result<(), WorldError> {
        let trunk_height = self.generate_trunk_height(rng);
        self.place_trunk(pos, trunk_height, world)?;
        self.place_canopy(pos, rng, world)?;
        log::debug!("Placed {} at {} (trunk {})", self.name, pos, trunk_height);
        Ok(())
    }
}

/// Species selector read from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeKind {
    #[default]
    Oak,
    Birch,
    Spruce,
    Jungle,
}

impl TreeKind {
    /// `oak`, `birch`, `spruce` or `jungle`; anything else is oak.
    pub fn from_selector(selector: &str) -> Self {
        match selector.trim() {
            "birch" => TreeKind::Birch,
            "spruce" => TreeKind::Spruce,
            "jungle" => TreeKind::Jungle,
            _ => TreeKind::Oak,
        }
    }

    pub fn species(self) -> TreeSpecies {
        match self {
            TreeKind::Oak => TreeSpecies::oak(),
            TreeKind::Birch => TreeSpecies::birch(false),
            TreeKind::Spruce => TreeSpecies::spruce(),
            TreeKind::Jungle => TreeSpecies::jungle(),
        }
    }
}
