//! World features for skyblock islands: the base chunk generator and
//! species-specific tree placement.

pub mod flat;
pub mod random;
pub mod tree;

pub use flat::SkyblockGenerator;
pub use random::RandomSource;
pub use tree::{SpeciesError, TreeKind, TreeSpecies, Variant};
