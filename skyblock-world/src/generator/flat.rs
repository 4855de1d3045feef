use crate::block::{Biome, Block};
use crate::chunk::Chunk;
use crate::generator::WorldGenerator;
use crate::pos::ChunkPos;

/// Infinite flat world: the same stack of layers in every chunk.
pub struct FlatGenerator {
    biome: Biome,
    // Top to bottom; the last layer sits on the floor of the world
    layers: Vec<Block>,
}

impl FlatGenerator {
    pub fn new(biome: Biome, layers: Vec<Block>) -> Self {
        Self { biome, layers }
    }

    pub fn biome(&self) -> Biome {
        self.biome
    }
}

impl WorldGenerator for FlatGenerator {
    fn generate_chunk(&self, _pos: ChunkPos, chunk: &mut Chunk) {
        chunk.set_biome(self.biome);
        let floor = chunk.range().start;
        for (i, block) in self.layers.iter().rev().enumerate() {
            chunk.fill_layer(floor + i as i32, *block);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_stack_from_floor() {
        let generator = FlatGenerator::new(Biome::Plains, vec![Block::Grass, Block::Dirt, Block::Bedrock]);
        let mut chunk = Chunk::new(-64..320, Biome::Ocean);
        generator.generate_chunk(ChunkPos::new(5, 5), &mut chunk);

        assert_eq!(chunk.biome(), Biome::Plains);
        assert_eq!(chunk.block(0, -64, 0), Block::Bedrock);
        assert_eq!(chunk.block(7, -63, 7), Block::Dirt);
        assert_eq!(chunk.block(15, -62, 15), Block::Grass);
        assert_eq!(chunk.block(15, -61, 15), Block::Air);
    }
}
