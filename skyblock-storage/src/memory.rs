use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;

use crate::ChunkStorage;

#[derive(Default)]
struct Inner {
    chunks: HashMap<(i32, i32), Vec<u8>>,
    level: Option<Vec<u8>>,
}

/// In-memory provider. Clones share the same backing map, so a test can keep
/// one handle and inspect what a world wrote through another.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunk_count(&self) -> usize {
        self.inner.lock().chunks.len()
    }
}

impl ChunkStorage for MemoryStorage {
    fn read_chunk(&self, chunk_x: i32, chunk_z: i32) -> Result<Option<Vec<u8>>> {
        Ok(self.inner.lock().chunks.get(&(chunk_x, chunk_z)).cloned())
    }

    fn write_chunk(&self, chunk_x: i32, chunk_z: i32, data: &[u8]) -> Result<()> {
        self.inner.lock().chunks.insert((chunk_x, chunk_z), data.to_vec());
        Ok(())
    }

    fn read_level(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.inner.lock().level.clone())
    }

    fn write_level(&self, data: &[u8]) -> Result<()> {
        self.inner.lock().level = Some(data.to_vec());
        Ok(())
    }
}
