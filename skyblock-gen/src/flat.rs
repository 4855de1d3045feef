use skyblock_world::generator::FlatGenerator;
use skyblock_world::{Biome, Block, Chunk, ChunkPos, WorldGenerator};

/// Base terrain of a skyblock world: open ocean, three layers of still
/// water over bedrock. Islands are written on top of it.
pub struct SkyblockGenerator {
    flat: FlatGenerator,
}

impl SkyblockGenerator {
    pub fn new() -> Self {
        let water = Block::Water { still: true, depth: 8 };
        Self {
            flat: FlatGenerator::new(Biome::Ocean, vec![water, water, water, Block::Bedrock]),
        }
    }
}

impl Default for SkyblockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldGenerator for SkyblockGenerator {
    fn generate_chunk(&self, pos: ChunkPos, chunk: &mut Chunk) {
        self.flat.generate_chunk(pos, chunk);
    }
}
