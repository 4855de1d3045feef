//! Column storage for one 16x16 chunk, split into 16-high sections.

use std::collections::HashMap;
use std::ops::Range;

use anyhow::{Context, Result, bail};
use skyblock_anvil::nbt::{self, Biomes, BlockStates, ChunkData, Section};
use skyblock_anvil::palette;

use crate::block::{Biome, Block};
use crate::pos::ChunkPos;

const SECTION_VOLUME: usize = 16 * 16 * 16;

pub struct Chunk {
    min_y: i32,
    biome: Biome,
    // None = all air
    sections: Vec<Option<Box<[Block]>>>,
}

impl Chunk {
    /// Empty (all air) chunk covering `range`. Bounds must be section aligned.
    pub fn new(range: Range<i32>, biome: Biome) -> Self {
        debug_assert!(range.start % 16 == 0 && range.end % 16 == 0);
        let count = ((range.end - range.start) / 16) as usize;
        Self {
            min_y: range.start,
            biome,
            sections: (0..count).map(|_| None).collect(),
        }
    }

    pub fn range(&self) -> Range<i32> {
        self.min_y..self.min_y + self.sections.len() as i32 * 16
    }

    pub fn biome(&self) -> Biome {
        self.biome
    }

    pub fn set_biome(&mut self, biome: Biome) {
        self.biome = biome;
    }

    // Index inside a section: Y -> Z -> X
    fn locate(&self, x: usize, y: i32, z: usize) -> Option<(usize, usize)> {
        if x >= 16 || z >= 16 || !self.range().contains(&y) {
            return None;
        }
        let rel = (y - self.min_y) as usize;
        Some((rel / 16, ((rel % 16) * 16 + z) * 16 + x))
    }

    /// Block at chunk-local `x`/`z` (0..16) and world `y`. Air outside the range.
    pub fn block(&self, x: usize, y: i32, z: usize) -> Block {
        match self.locate(x, y, z) {
            Some((section, index)) => self.sections[section]
                .as_ref()
                .map_or(Block::Air, |blocks| blocks[index]),
            None => Block::Air,
        }
    }

    /// Returns false when the coordinates fall outside the chunk.
    pub fn set_block(&mut self, x: usize, y: i32, z: usize, block: Block) -> bool {
        let Some((section, index)) = self.locate(x, y, z) else {
            return false;
        };
        if let Some(blocks) = self.sections[section].as_mut() {
            blocks[index] = block;
        } else if !block.is_air() {
            let mut blocks = vec![Block::Air; SECTION_VOLUME].into_boxed_slice();
            blocks[index] = block;
            self.sections[section] = Some(blocks);
        }
        true
    }

    /// Fill an entire Y-layer with a block.
    pub fn fill_layer(&mut self, y: i32, block: Block) {
        for z in 0..16 {
            for x in 0..16 {
                self.set_block(x, y, z, block);
            }
        }
    }

    pub fn to_nbt(&self, pos: ChunkPos) -> ChunkData {
        let sections = self
            .sections
            .iter()
            .enumerate()
            .map(|(i, blocks)| self.encode_section(self.min_y / 16 + i as i32, blocks.as_deref()))
            .collect();

        ChunkData {
            data_version: nbt::data_version(),
            x_pos: pos.x,
            z_pos: pos.z,
            y_pos: self.min_y / 16,
            status: "minecraft:full".to_string(),
            last_update: 0,
            inhabited_time: 0,
            sections,
        }
    }

    fn encode_section(&self, sec_y: i32, blocks: Option<&[Block]>) -> Section {
        let biomes = Some(Biomes { palette: vec![self.biome.name().to_string()], data: None });

        let Some(blocks) = blocks else {
            return Section {
                y: sec_y as i8,
                block_states: Some(BlockStates { palette: vec![Block::Air.to_state()], data: None }),
                biomes,
            };
        };

        let mut palette = Vec::new();
        let mut lookup = HashMap::new();
        let indices: Vec<usize> = blocks
            .iter()
            .map(|block| {
                *lookup.entry(*block).or_insert_with(|| {
                    palette.push(block.to_state());
                    palette.len() - 1
                })
            })
            .collect();

        // Uniform sections carry no data array
        let data = (palette.len() > 1)
            .then(|| fastnbt::LongArray::new(palette::pack(&indices, palette.len())));

        Section {
            y: sec_y as i8,
            block_states: Some(BlockStates { palette, data }),
            biomes,
        }
    }

    /// Rebuild a chunk from stored NBT, filling `range` (sections outside it are dropped).
    pub fn from_nbt(data: &ChunkData, range: Range<i32>) -> Result<Self> {
        let mut chunk = Chunk::new(range, Biome::default());

        for section in &data.sections {
            if let Some(biome) = section
                .biomes
                .as_ref()
                .and_then(|b| b.palette.first())
                .and_then(|name| Biome::from_name(name))
            {
                chunk.biome = biome;
            }

            let Some(states) = &section.block_states else {
                continue;
            };
            if states.palette.is_empty() {
                bail!("section {} has an empty palette", section.y);
            }
            let palette = states
                .palette
                .iter()
                .map(Block::from_state)
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("Bad palette in section {}", section.y))?;

            let base_y = section.y as i32 * 16;
            if !chunk.range().contains(&base_y) {
                log::warn!("Dropping section {} outside of {:?}", section.y, chunk.range());
                continue;
            }

            let indices = match &states.data {
                Some(longs) => palette::unpack(longs, palette.len(), SECTION_VOLUME),
                None if palette[0].is_air() => continue,
                None => vec![0; SECTION_VOLUME],
            };

            let mut blocks = Vec::with_capacity(SECTION_VOLUME);
            for idx in indices {
                let block = palette
                    .get(idx)
                    .copied()
                    .with_context(|| format!("Palette index {} out of range in section {}", idx, section.y))?;
                blocks.push(block);
            }
            let slot = ((base_y - chunk.min_y) / 16) as usize;
            chunk.sections[slot] = Some(blocks.into_boxed_slice());
        }

        Ok(chunk)
    }
}
