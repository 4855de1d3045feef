//! Leaf placement above the trunk.

use skyblock_world::{BlockAccess, BlockPos, WorldError};

use super::TreeSpecies;
use crate::random::RandomSource;

/// Half-width of a blob canopy layer, `y_off` being the (non-positive)
/// offset from the top layer. Gives 2, 2, 1, 1 from bottom to top.
pub fn layer_half_width(y_off: i32) -> i32 {
    1 - y_off / 2
}

/// Blob canopy shared by generic and birch trees: four layers ending at
/// `pos.y + canopy_height`. Apex corners are always left out; corners of the
/// lower layers are left out on a coin flip.
pub fn place_blob(
    species: &TreeSpecies,
    pos: BlockPos,
    rng: &mut dyn RandomSource,
    world: &mut dyn BlockAccess,
) -> Result<(), WorldError> {
    let top = pos.y + species.canopy_height();
    for yy in top - 3..=top {
        let y_off = yy - top;
        let mid = layer_half_width(y_off);
        for xx in pos.x - mid..=pos.x + mid {
            let x_off = (xx - pos.x).abs();
            for zz in pos.z - mid..=pos.z + mid {
                let z_off = (zz - pos.z).abs();
                if x_off == mid && z_off == mid && (y_off == 0 || rng.next_int(2) == 0) {
                    continue;
                }
                world.set_block(BlockPos::new(xx, yy, zz), species.leaf_block())?;
            }
        }
    }
    Ok(())
}

/// Rolling radius of the spruce canopy, walked from the apex downwards.
///
/// The radius climbs by one per layer until it reaches `max_radius`, then
/// drops back to `min_radius` while `max_radius` grows by one, capped at
/// `limit`. After the first drop `min_radius` stays at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpruceRing {
    radius: i32,
    min_radius: i32,
    max_radius: i32,
    limit: i32,
}

impl SpruceRing {
    pub fn new(radius: i32, limit: i32) -> Self {
        Self { radius, min_radius: 0, max_radius: 1, limit }
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    pub fn advance(&mut self) {
        if self.radius >= self.max_radius {
            self.radius = self.min_radius;
            self.min_radius = 1;
            self.max_radius = (self.max_radius + 1).min(self.limit);
        } else {
            self.radius += 1;
        }
    }
}

/// Layered cone: square rings without corners, from the apex at
/// `pos.y + canopy_height` down `top_size` layers.
pub fn place_spruce(
    species: &TreeSpecies,
    pos: BlockPos,
    rng: &mut dyn RandomSource,
    world: &mut dyn BlockAccess,
) -> Result<(), WorldError> {
    let height = species.canopy_height();
    let top_size = height - (1 + rng.next_int(2));
    let limit = 2 + rng.next_int(2);
    let mut ring = SpruceRing::new(rng.next_int(2), limit);

    for yy in 0..=top_size {
        let y = pos.y + height - yy;
        let radius = ring.radius();
        for xx in -radius..=radius {
            for zz in -radius..=radius {
                if radius > 0 && xx.abs() == radius && zz.abs() == radius {
                    continue;
                }
                world.set_block(BlockPos::new(pos.x + xx, y, pos.z + zz), species.leaf_block())?;
            }
        }
        ring.advance();
    }
    Ok(())
}
