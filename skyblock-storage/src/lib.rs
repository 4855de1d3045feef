//! Persistence providers for worlds.
//!
//! A provider stores opaque chunk payloads (raw NBT) keyed by chunk
//! coordinates, plus one level-data document per world.

use anyhow::Result;

pub mod fs;
pub mod memory;

pub use fs::FsStorage;
pub use memory::MemoryStorage;
pub use skyblock_anvil::Compression;

pub trait ChunkStorage: Send {
    fn read_chunk(&self, chunk_x: i32, chunk_z: i32) -> Result<Option<Vec<u8>>>;
    fn write_chunk(&self, chunk_x: i32, chunk_z: i32, data: &[u8]) -> Result<()>;

    fn read_level(&self) -> Result<Option<Vec<u8>>>;
    fn write_level(&self, data: &[u8]) -> Result<()>;
}
