//! Block-addressable voxel worlds backed by a chunk provider.

pub mod block;
pub mod chunk;
pub mod config;
pub mod error;
pub mod generator;
pub mod pos;
pub mod world;

pub use block::{Axis, Biome, Block, WoodType};
pub use chunk::Chunk;
pub use config::{Dimension, PortalDestination, WorldConfig};
pub use error::WorldError;
pub use generator::WorldGenerator;
pub use pos::{BlockPos, ChunkPos};
pub use world::{BlockAccess, World};
