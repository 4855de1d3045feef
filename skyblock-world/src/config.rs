use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use skyblock_storage::ChunkStorage;

use crate::error::WorldError;
use crate::generator::WorldGenerator;
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    #[default]
    Overworld,
    Nether,
    End,
}

impl Dimension {
    /// Buildable Y range, section aligned.
    pub fn range(self) -> Range<i32> {
        match self {
            Dimension::Overworld => -64..320,
            Dimension::Nether => 0..128,
            Dimension::End => 0..256,
        }
    }
}

/// Resolves the name of the world a portal in this world leads to.
pub type PortalDestination = Box<dyn Fn(Dimension) -> Option<String> + Send + Sync>;

/// Everything needed to materialize a [`World`].
pub struct WorldConfig {
    pub name: String,
    pub dimension: Dimension,
    pub portal_destination: PortalDestination,
    pub storage: Box<dyn ChunkStorage>,
    pub generator: Arc<dyn WorldGenerator>,
    pub read_only: bool,
    /// Random ticks per sub-chunk per tick, handed to the engine as-is.
    pub random_tick_speed: u32,
    pub seed: u64,
}

impl WorldConfig {
    pub fn new(name: impl Into<String>, storage: Box<dyn ChunkStorage>, generator: Arc<dyn WorldGenerator>) -> Self {
        Self {
            name: name.into(),
            dimension: Dimension::Overworld,
            portal_destination: Box::new(|_| None),
            storage,
            generator,
            read_only: false,
            random_tick_speed: 3,
            seed: 0,
        }
    }

    pub fn build(self) -> Result<World, WorldError> {
        World::from_config(self)
    }
}

impl fmt::Debug for WorldConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorldConfig")
            .field("name", &self.name)
            .field("dimension", &self.dimension)
            .field("read_only", &self.read_only)
            .field("random_tick_speed", &self.random_tick_speed)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}
