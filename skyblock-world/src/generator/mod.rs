use crate::chunk::Chunk;
use crate::pos::ChunkPos;

pub mod flat;

pub use flat::FlatGenerator;

/// Fills freshly created chunks that have nothing stored yet.
pub trait WorldGenerator: Send + Sync {
    fn generate_chunk(&self, pos: ChunkPos, chunk: &mut Chunk);
}
