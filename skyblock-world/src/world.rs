use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use skyblock_anvil::nbt::ChunkData;
use skyblock_storage::ChunkStorage;

use crate::block::Block;
use crate::chunk::Chunk;
use crate::config::{Dimension, PortalDestination, WorldConfig};
use crate::error::WorldError;
use crate::generator::WorldGenerator;
use crate::pos::{BlockPos, ChunkPos};

/// Read/write access to blocks, as needed by feature placement.
pub trait BlockAccess {
    fn block(&mut self, pos: BlockPos) -> Result<Block, WorldError>;
    fn set_block(&mut self, pos: BlockPos, block: Block) -> Result<(), WorldError>;
}

// Persisted next to the chunks as level.json
#[derive(Debug, Serialize, Deserialize)]
struct LevelData {
    name: String,
    dimension: Dimension,
    seed: u64,
    spawn: BlockPos,
}

pub struct World {
    name: String,
    dimension: Dimension,
    portal_destination: PortalDestination,
    storage: Box<dyn ChunkStorage>,
    generator: Arc<dyn WorldGenerator>,
    read_only: bool,
    random_tick_speed: u32,
    seed: u64,
    spawn: BlockPos,
    chunks: HashMap<ChunkPos, Chunk>,
    dirty: HashSet<ChunkPos>,
    level_dirty: bool,
}

impl World {
    pub(crate) fn from_config(config: WorldConfig) -> Result<Self, WorldError> {
        let stored = match config.storage.read_level()? {
            Some(bytes) => Some(
                serde_json::from_slice::<LevelData>(&bytes)
                    .with_context(|| format!("Corrupt level data for world {}", config.name))?,
            ),
            None => None,
        };

        // Stored level data wins over the config on reopen
        let (seed, spawn) = match &stored {
            Some(level) => {
                if level.dimension != config.dimension {
                    return Err(anyhow!(
                        "World {} is stored as {:?}, cannot open it as {:?}",
                        config.name,
                        level.dimension,
                        config.dimension
                    )
                    .into());
                }
                log::info!("Reopened world {} (seed {}, spawn {})", config.name, level.seed, level.spawn);
                (level.seed, level.spawn)
            }
            None => (config.seed, BlockPos::new(0, config.dimension.range().start, 0)),
        };

        Ok(Self {
            name: config.name,
            dimension: config.dimension,
            portal_destination: config.portal_destination,
            storage: config.storage,
            generator: config.generator,
            read_only: config.read_only,
            random_tick_speed: config.random_tick_speed,
            seed,
            spawn,
            chunks: HashMap::new(),
            dirty: HashSet::new(),
            level_dirty: stored.is_none(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn range(&self) -> Range<i32> {
        self.dimension.range()
    }

    pub fn read_only(&self) -> bool {
        self.read_only
    }

    pub fn random_tick_speed(&self) -> u32 {
        self.random_tick_speed
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn portal_destination(&self, dimension: Dimension) -> Option<String> {
        (self.portal_destination)(dimension)
    }

    pub fn spawn(&self) -> BlockPos {
        self.spawn
    }

    pub fn set_spawn(&mut self, pos: BlockPos) -> Result<(), WorldError> {
        if self.read_only {
            return Err(WorldError::ReadOnly(self.name.clone()));
        }
        self.spawn = pos;
        self.level_dirty = true;
        Ok(())
    }

    pub fn loaded_chunks(&self) -> usize {
        self.chunks.len()
    }

    fn chunk_mut(&mut self, pos: ChunkPos) -> Result<&mut Chunk, WorldError> {
        match self.chunks.entry(pos) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let chunk = load_chunk(
                    self.storage.as_ref(),
                    self.generator.as_ref(),
                    &self.name,
                    self.dimension.range(),
                    pos,
                )?;
                Ok(entry.insert(chunk))
            }
        }
    }

    /// Write every modified chunk and the level data to the provider.
    pub fn save(&mut self) -> Result<usize, WorldError> {
        let mut saved = 0;
        let mut dirty: Vec<ChunkPos> = self.dirty.iter().copied().collect();
        dirty.sort_by_key(|pos| (pos.x, pos.z));

        for pos in dirty {
            if let Some(chunk) = self.chunks.get(&pos) {
                let bytes = fastnbt::to_bytes(&chunk.to_nbt(pos))
                    .with_context(|| format!("Failed to encode chunk {},{} of {}", pos.x, pos.z, self.name))?;
                self.storage.write_chunk(pos.x, pos.z, &bytes)?;
                self.dirty.remove(&pos);
                saved += 1;
            }
        }

        if self.level_dirty {
            let level = LevelData {
                name: self.name.clone(),
                dimension: self.dimension,
                seed: self.seed,
                spawn: self.spawn,
            };
            let bytes = serde_json::to_vec_pretty(&level).context("Failed to encode level data")?;
            self.storage.write_level(&bytes)?;
            self.level_dirty = false;
        }

        log::debug!("Saved {} chunks of world {}", saved, self.name);
        Ok(saved)
    }

    /// Flush everything and drop the world.
    pub fn close(mut self) -> Result<(), WorldError> {
        if !self.read_only {
            self.save()?;
        }
        log::info!("Closed world {}", self.name);
        Ok(())
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("name", &self.name)
            .field("dimension", &self.dimension)
            .field("read_only", &self.read_only)
            .field("seed", &self.seed)
            .field("spawn", &self.spawn)
            .field("loaded_chunks", &self.chunks.len())
            .field("dirty_chunks", &self.dirty.len())
            .finish_non_exhaustive()
    }
}

/// Stored chunk if the provider has one, otherwise a freshly generated one.
fn load_chunk(
    storage: &dyn ChunkStorage,
    generator: &dyn WorldGenerator,
    world: &str,
    range: Range<i32>,
    pos: ChunkPos,
) -> Result<Chunk, WorldError> {
    match storage.read_chunk(pos.x, pos.z)? {
        Some(bytes) => {
            let data: ChunkData = fastnbt::from_bytes(&bytes)
                .with_context(|| format!("Failed to decode chunk {},{} of {}", pos.x, pos.z, world))?;
            log::debug!("Loaded chunk {},{} of {}", pos.x, pos.z, world);
            Ok(Chunk::from_nbt(&data, range)?)
        }
        None => {
            let mut chunk = Chunk::new(range, Default::default());
            generator.generate_chunk(pos, &mut chunk);
            log::debug!("Generated chunk {},{} of {}", pos.x, pos.z, world);
            Ok(chunk)
        }
    }
}

impl BlockAccess for World {
    /// Air above and below the build range.
    fn block(&mut self, pos: BlockPos) -> Result<Block, WorldError> {
        if !self.range().contains(&pos.y) {
            return Ok(Block::Air);
        }
        let (x, z) = pos.local_xz();
        Ok(self.chunk_mut(pos.chunk())?.block(x, pos.y, z))
    }

    fn set_block(&mut self, pos: BlockPos, block: Block) -> Result<(), WorldError> {
        if self.read_only {
            return Err(WorldError::ReadOnly(self.name.clone()));
        }
        if !self.range().contains(&pos.y) {
            return Err(WorldError::OutOfBounds { world: self.name.clone(), pos });
        }
        let (x, z) = pos.local_xz();
        let chunk_pos = pos.chunk();
        self.chunk_mut(chunk_pos)?.set_block(x, pos.y, z, block);
        self.dirty.insert(chunk_pos);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Biome;
    use crate::generator::FlatGenerator;
    use skyblock_storage::MemoryStorage;

    fn flat_world(storage: &MemoryStorage) -> World {
        let generator = Arc::new(FlatGenerator::new(Biome::Plains, vec![Block::Stone, Block::Bedrock]));
        WorldConfig::new("test", Box::new(storage.clone()), generator).build().unwrap()
    }

    #[test]
    fn test_generates_on_first_access() {
        let storage = MemoryStorage::new();
        let mut world = flat_world(&storage);
        assert_eq!(world.loaded_chunks(), 0);
        assert_eq!(world.block(BlockPos::new(40, -64, -40)).unwrap(), Block::Bedrock);
        assert_eq!(world.block(BlockPos::new(40, -63, -40)).unwrap(), Block::Stone);
        assert_eq!(world.block(BlockPos::new(40, -62, -40)).unwrap(), Block::Air);
        assert_eq!(world.loaded_chunks(), 1);
    }

    #[test]
    fn test_bounds() {
        let storage = MemoryStorage::new();
        let mut world = flat_world(&storage);
        assert_eq!(world.block(BlockPos::new(0, 500, 0)).unwrap(), Block::Air);
        let err = world.set_block(BlockPos::new(0, 320, 0), Block::Dirt).unwrap_err();
        assert!(matches!(err, WorldError::OutOfBounds { .. }));
        // Reads outside the range must not load chunks
        assert_eq!(world.loaded_chunks(), 0);
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let generator = Arc::new(FlatGenerator::new(Biome::Plains, vec![Block::Bedrock]));
        let mut config = WorldConfig::new("museum", Box::new(MemoryStorage::new()), generator);
        config.read_only = true;
        let mut world = config.build().unwrap();

        assert!(matches!(world.set_block(BlockPos::new(0, 0, 0), Block::Dirt), Err(WorldError::ReadOnly(_))));
        assert!(matches!(world.set_spawn(BlockPos::new(1, 2, 3)), Err(WorldError::ReadOnly(_))));
    }

    #[test]
    fn test_save_and_reopen() {
        let storage = MemoryStorage::new();
        {
            let mut world = flat_world(&storage);
            world.set_block(BlockPos::new(3, 10, 3), Block::Dirt).unwrap();
            world.set_block(BlockPos::new(-20, 10, 3), Block::Grass).unwrap();
            world.set_spawn(BlockPos::new(3, 11, 3)).unwrap();
            // Only read, never written: stays out of storage
            world.block(BlockPos::new(100, 0, 100)).unwrap();
            assert_eq!(world.save().unwrap(), 2);
            assert_eq!(world.save().unwrap(), 0);
        }
        assert_eq!(storage.chunk_count(), 2);

        let mut world = flat_world(&storage);
        assert_eq!(world.spawn(), BlockPos::new(3, 11, 3));
        assert_eq!(world.block(BlockPos::new(3, 10, 3)).unwrap(), Block::Dirt);
        assert_eq!(world.block(BlockPos::new(-20, 10, 3)).unwrap(), Block::Grass);
        // Generated content of the stored chunk survived too
        assert_eq!(world.block(BlockPos::new(3, -64, 3)).unwrap(), Block::Bedrock);
    }

    #[test]
    fn test_reopen_keeps_stored_seed() {
        let storage = MemoryStorage::new();
        let generator = Arc::new(FlatGenerator::new(Biome::Plains, vec![Block::Bedrock]));
        {
            let mut config = WorldConfig::new("seeded", Box::new(storage.clone()), generator.clone());
            config.seed = 11;
            config.build().unwrap().close().unwrap();
        }

        let mut config = WorldConfig::new("seeded", Box::new(storage.clone()), generator.clone());
        config.seed = 22;
        let mut world = config.build().unwrap();
        assert_eq!(world.seed(), 11);
        world.set_spawn(BlockPos::new(1, 0, 1)).unwrap();
        world.close().unwrap();

        let world = WorldConfig::new("seeded", Box::new(storage.clone()), generator.clone()).build().unwrap();
        assert_eq!(world.seed(), 11);
        assert_eq!(world.spawn(), BlockPos::new(1, 0, 1));

        let mut nether = WorldConfig::new("seeded", Box::new(storage), generator);
        nether.dimension = Dimension::Nether;
        assert!(matches!(nether.build(), Err(WorldError::Storage(_))));
    }

    #[test]
    fn test_debug_summary() {
        let storage = MemoryStorage::new();
        let mut world = flat_world(&storage);
        world.set_block(BlockPos::new(0, 0, 0), Block::Dirt).unwrap();
        let text = format!("{:?}", world);
        assert!(text.contains("name: \"test\""));
        assert!(text.contains("dirty_chunks: 1"));
    }

    #[test]
    fn test_default_portal_destination() {
        let storage = MemoryStorage::new();
        let world = flat_world(&storage);
        assert_eq!(world.portal_destination(Dimension::Nether), None);
        assert_eq!(world.random_tick_speed(), 3);
    }
}
