//! Registry of loaded worlds and the island bootstrap run for each new one.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use skyblock_gen::{SkyblockGenerator, TreeSpecies};
use skyblock_storage::{Compression, FsStorage};
use skyblock_world::{Block, BlockAccess, BlockPos, Dimension, World, WorldConfig, WorldError};
use thiserror::Error;

use crate::seed::SeedSource;

/// Shared handle to a loaded world. Block writes go through the lock.
pub type WorldHandle = Arc<Mutex<World>>;

/// Lowest layer of the island platform, one above the bedrock floor.
pub const Y_START: i32 = -63;
const PLATFORM_LAYERS: i32 = 5;
pub const SPAWN_POS: BlockPos = BlockPos::new(3, Y_START + 4, 8);
pub const TREE_POS: BlockPos = BlockPos::new(8, Y_START + 4, 8);
const RANDOM_TICK_SPEED: u32 = 3;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("failed to open storage for world {name}")]
    ProviderOpen {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("world {0} is already loaded")]
    AlreadyLoaded(String),

    #[error("failed to build the island of world {name}")]
    Bootstrap {
        name: String,
        #[source]
        source: WorldError,
    },

    #[error("failed to place the starter tree in world {name}")]
    TreePlacement {
        name: String,
        #[source]
        source: WorldError,
    },

    #[error("world {0} does not exist or has not been loaded yet")]
    WorldNotFound(String),

    #[error("failed to save world {name}")]
    Save {
        name: String,
        #[source]
        source: WorldError,
    },
}

pub struct WorldManager {
    root: PathBuf,
    compression: Compression,
    species: TreeSpecies,
    seeds: SeedSource,
    generator: Arc<SkyblockGenerator>,
    worlds: HashMap<String, WorldHandle>,
}

impl WorldManager {
    pub fn new(root: impl AsRef<Path>, compression: Compression, species: TreeSpecies, seeds: SeedSource) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            compression,
            species,
            seeds,
            generator: Arc::new(SkyblockGenerator::new()),
            worlds: HashMap::new(),
        }
    }

    pub fn species(&self) -> &TreeSpecies {
        &self.species
    }

    /// Open (or reopen) the world stored under `name` and build its island:
    /// dirt/grass platform, spawn point and starter tree.
    ///
    /// The world is registered once the platform and spawn are written, so it
    /// stays registered when the tree fails. Nothing is rolled back.
    pub fn new_world(&mut self, name: &str) -> Result<WorldHandle, ManagerError> {
        if self.worlds.contains_key(name) {
            return Err(ManagerError::AlreadyLoaded(name.to_string()));
        }

        let storage = FsStorage::open(self.root.join(name), self.compression).map_err(|e| {
            ManagerError::ProviderOpen { name: name.to_string(), source: e.into() }
        })?;

        let mut config = WorldConfig::new(name, Box::new(storage), self.generator.clone());
        config.dimension = Dimension::Overworld;
        config.portal_destination = Box::new(|_| None);
        config.read_only = false;
        config.random_tick_speed = RANDOM_TICK_SPEED;
        config.seed = self.seeds.next_seed();
        let mut world = config.build().map_err(|e| ManagerError::ProviderOpen {
            name: name.to_string(),
            source: Box::new(e),
        })?;

        let bootstrap = |source| ManagerError::Bootstrap { name: name.to_string(), source };
        build_platform(&mut world).map_err(bootstrap)?;
        world.set_spawn(SPAWN_POS).map_err(bootstrap)?;

        // Own stream for the tree, independent of the world's seed
        let mut rng = StdRng::seed_from_u64(self.seeds.next_seed());
        let placed = self.species.place_tree(&mut world, TREE_POS, &mut rng);

        let handle = Arc::new(Mutex::new(world));
        self.worlds.insert(name.to_string(), handle.clone());

        placed.map_err(|source| ManagerError::TreePlacement { name: name.to_string(), source })?;
        log::info!("Created island world {} with a {}", name, self.species.name());
        Ok(handle)
    }

    pub fn get_world(&self, name: &str) -> Result<WorldHandle, ManagerError> {
        self.worlds
            .get(name)
            .cloned()
            .ok_or_else(|| ManagerError::WorldNotFound(name.to_string()))
    }

    pub fn world_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.worlds.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn save_all(&self) -> Result<(), ManagerError> {
        for (name, handle) in &self.worlds {
            let saved = handle
                .lock()
                .save()
                .map_err(|source| ManagerError::Save { name: name.clone(), source })?;
            log::debug!("Saved {} chunks of {}", saved, name);
        }
        Ok(())
    }

    /// Save and unload every world.
    pub fn close(self) -> Result<(), ManagerError> {
        for (name, handle) in self.worlds {
            match Arc::try_unwrap(handle) {
                Ok(world) => world
                    .into_inner()
                    .close()
                    .map_err(|source| ManagerError::Save { name, source })?,
                Err(shared) => {
                    log::warn!("World {} is still referenced, saving without unloading", name);
                    shared.lock().save().map_err(|source| ManagerError::Save { name, source })?;
                }
            }
        }
        Ok(())
    }
}

/// 16x16 platform over the origin chunk: four layers of dirt under one of grass.
fn build_platform(world: &mut World) -> Result<(), WorldError> {
    for x in 0..16 {
        for z in 0..16 {
            for y in Y_START..Y_START + PLATFORM_LAYERS {
                let block = if y < Y_START + PLATFORM_LAYERS - 1 { Block::Dirt } else { Block::Grass };
                world.set_block(BlockPos::new(x, y, z), block)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyblock_gen::Variant;

    fn manager(root: &Path, species: TreeSpecies, seed: u64) -> WorldManager {
        WorldManager::new(root, Compression::Zlib, species, SeedSource::new(seed))
    }

    #[test]
    fn test_bootstrap_platform() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager(dir.path(), TreeSpecies::oak(), 1);
        let handle = manager.new_world("x").unwrap();
        let mut world = handle.lock();

        for x in 0..16 {
            for z in 0..16 {
                for y in Y_START..Y_START + 4 {
                    assert_eq!(world.block(BlockPos::new(x, y, z)).unwrap(), Block::Dirt);
                }
                let top = world.block(BlockPos::new(x, Y_START + 4, z)).unwrap();
                if (x, z) == (TREE_POS.x, TREE_POS.z) {
                    // The trunk replaces the grass it stands on
                    assert_eq!(top, TreeSpecies::oak().trunk_block());
                } else {
                    assert_eq!(top, Block::Grass);
                }
            }
        }
        assert_eq!(world.spawn(), BlockPos::new(3, Y_START + 4, 8));
    }

    #[test]
    fn test_starter_tree_and_ocean() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager(dir.path(), TreeSpecies::oak(), 2);
        let handle = manager.new_world("island").unwrap();
        let mut world = handle.lock();

        let oak = TreeSpecies::oak();
        assert_eq!(world.block(TREE_POS.offset(0, -1, 0)).unwrap(), Block::Dirt);
        for yy in 0..4 {
            assert_eq!(world.block(TREE_POS.offset(0, yy, 0)).unwrap(), oak.trunk_block());
        }
        // Leaves replace the top of the trunk
        for yy in 4..8 {
            assert_eq!(world.block(TREE_POS.offset(0, yy, 0)).unwrap(), oak.leaf_block());
        }
        assert_eq!(world.block(TREE_POS.offset(1, 7, 0)).unwrap(), oak.leaf_block());
        assert_eq!(world.block(TREE_POS.offset(0, 8, 0)).unwrap(), Block::Air);

        // Outside the island: water over bedrock
        let water = Block::Water { still: true, depth: 8 };
        assert_eq!(world.block(BlockPos::new(40, -64, 40)).unwrap(), Block::Bedrock);
        assert_eq!(world.block(BlockPos::new(40, -61, 40)).unwrap(), water);
        assert_eq!(world.block(BlockPos::new(40, -60, 40)).unwrap(), Block::Air);
        assert_eq!(world.random_tick_speed(), 3);
        assert_eq!(world.portal_destination(Dimension::Nether), None);
    }

    #[test]
    fn test_registry() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager(dir.path(), TreeSpecies::birch(false), 3);
        let created = manager.new_world("alpha").unwrap();

        let found = manager.get_world("alpha").unwrap();
        assert!(Arc::ptr_eq(&created, &found));
        assert!(matches!(manager.get_world("beta"), Err(ManagerError::WorldNotFound(name)) if name == "beta"));
        assert!(matches!(manager.new_world("alpha"), Err(ManagerError::AlreadyLoaded(_))));
        assert_eq!(manager.world_names(), vec!["alpha"]);
    }

    #[test]
    fn test_provider_open_failure() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("blocked"), b"file in the way").unwrap();
        let mut manager = manager(dir.path(), TreeSpecies::oak(), 4);

        let err = manager.new_world("blocked").unwrap_err();
        assert!(matches!(err, ManagerError::ProviderOpen { .. }));
        assert!(matches!(manager.get_world("blocked"), Err(ManagerError::WorldNotFound(_))));
    }

    #[test]
    fn test_tree_failure_keeps_world() {
        let dir = tempfile::tempdir().unwrap();
        let oak = TreeSpecies::oak();
        // Trunk runs past the build limit
        let beanstalk = TreeSpecies::new("Beanstalk", oak.trunk_block(), oak.leaf_block(), 400, Variant::Generic).unwrap();
        let mut manager = manager(dir.path(), beanstalk, 5);

        let err = manager.new_world("tall").unwrap_err();
        assert!(matches!(
            err,
            ManagerError::TreePlacement { source: WorldError::OutOfBounds { .. }, .. }
        ));

        let handle = manager.get_world("tall").unwrap();
        let mut world = handle.lock();
        assert_eq!(world.block(BlockPos::new(0, Y_START, 0)).unwrap(), Block::Dirt);
        assert_eq!(world.block(TREE_POS.offset(0, 100, 0)).unwrap(), oak.trunk_block());
        assert_eq!(world.spawn(), SPAWN_POS);
    }

    #[test]
    fn test_same_seed_same_island() {
        let first_dir = tempfile::tempdir().unwrap();
        let second_dir = tempfile::tempdir().unwrap();
        let first = manager(first_dir.path(), TreeSpecies::spruce(), 77).new_world("a").unwrap();
        let second = manager(second_dir.path(), TreeSpecies::spruce(), 77).new_world("a").unwrap();

        let (mut first, mut second) = (first.lock(), second.lock());
        assert_eq!(first.seed(), second.seed());
        for x in 4..13 {
            for z in 4..13 {
                for y in TREE_POS.y..TREE_POS.y + 10 {
                    let pos = BlockPos::new(x, y, z);
                    assert_eq!(first.block(pos).unwrap(), second.block(pos).unwrap(), "at {}", pos);
                }
            }
        }
    }

    #[test]
    fn test_reopen_keeps_player_changes() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut manager = manager(dir.path(), TreeSpecies::jungle(), 6);
            let handle = manager.new_world("home").unwrap();
            handle.lock().set_block(BlockPos::new(40, 0, 40), Block::Stone).unwrap();
            drop(handle);
            manager.close().unwrap();
        }
        assert!(dir.path().join("home").join("level.json").is_file());

        let mut manager = manager(dir.path(), TreeSpecies::jungle(), 7);
        let handle = manager.new_world("home").unwrap();
        let mut world = handle.lock();
        assert_eq!(world.block(BlockPos::new(40, 0, 40)).unwrap(), Block::Stone);
        assert_eq!(world.block(BlockPos::new(0, Y_START + 4, 0)).unwrap(), Block::Grass);
    }

    #[test]
    fn test_reopen_keeps_world_seed() {
        let dir = tempfile::tempdir().unwrap();
        let first_seed = {
            let mut manager = manager(dir.path(), TreeSpecies::oak(), 1);
            let seed = manager.new_world("home").unwrap().lock().seed();
            manager.close().unwrap();
            seed
        };

        {
            let mut manager = manager(dir.path(), TreeSpecies::oak(), 2);
            let handle = manager.new_world("home").unwrap();
            assert_eq!(handle.lock().seed(), first_seed);
            drop(handle);
            manager.close().unwrap();
        }

        // The bootstrap rewrite on reopen must not replace the stored seed
        let mut manager = manager(dir.path(), TreeSpecies::oak(), 3);
        assert_eq!(manager.new_world("home").unwrap().lock().seed(), first_seed);
    }
}
