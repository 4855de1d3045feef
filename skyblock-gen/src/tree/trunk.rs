use skyblock_world::{Block, BlockAccess, BlockPos, WorldError};

use super::TreeSpecies;
use crate::random::RandomSource;

/// Generic and birch trunks: one block taller than the canopy, no draw.
pub fn fixed_height(species: &TreeSpecies, _rng: &mut dyn RandomSource) -> i32 {
    species.canopy_height() + 1
}

/// Spruce trunks get 0..=2 extra blocks.
pub fn spruce_height(species: &TreeSpecies, rng: &mut dyn RandomSource) -> i32 {
    species.canopy_height() + rng.next_int(3)
}

/// Dirt under the base, then `trunk_height` trunk blocks upwards from `pos`.
pub fn place(species: &TreeSpecies, pos: BlockPos, trunk_height: i32, world: &mut dyn BlockAccess) -> Result<(), WorldError> {
    world.set_block(pos.offset(0, -1, 0), Block::Dirt)?;
    for yy in 0..trunk_height {
        world.set_block(pos.offset(0, yy, 0), species.trunk_block())?;
    }
    Ok(())
}
