//! NBT (Named Binary Tag) structures for persisted chunk data.
//!
//! Serialized with fastnbt; the layout follows the 1.18+ section format
//! (paletted block states, one biome palette per section).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Data version written into every chunk (1.21.11 by default).
/// Can be overridden by MC_DATA_VERSION env var.
pub fn data_version() -> i32 {
    std::env::var("MC_DATA_VERSION")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(4671)
}

/// Root of a stored chunk.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChunkData {
    #[serde(rename = "DataVersion")]
    pub data_version: i32,

    // Chunk coordinates (absolute)
    #[serde(rename = "xPos")]
    pub x_pos: i32,
    #[serde(rename = "zPos")]
    pub z_pos: i32,
    // Lowest section index
    #[serde(rename = "yPos")]
    pub y_pos: i32,

    #[serde(rename = "Status")]
    pub status: String,

    #[serde(rename = "LastUpdate", default)]
    pub last_update: i64,

    #[serde(rename = "InhabitedTime", default)]
    pub inhabited_time: i64,

    pub sections: Vec<Section>,
}

// --- Section (16x16x16 Cube) ---
#[derive(Debug, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "Y")]
    pub y: i8,

    #[serde(rename = "block_states", alias = "BlockStates", default)]
    pub block_states: Option<BlockStates>,

    #[serde(rename = "biomes", alias = "Biomes", default)]
    pub biomes: Option<Biomes>,
}

// Indices into the palette, packed by `palette::pack`.
// Absent when the palette has a single entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct BlockStates {
    pub palette: Vec<BlockState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<fastnbt::LongArray>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Biomes {
    pub palette: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<fastnbt::LongArray>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockState {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Properties", default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, String>>,
}

impl BlockState {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), properties: None }
    }

    pub fn with_property(mut self, key: &str, value: impl ToString) -> Self {
        self.properties
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.as_ref()?.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_nbt_survives_fastnbt() {
        let chunk = ChunkData {
            data_version: 4671,
            x_pos: -2,
            z_pos: 5,
            y_pos: -4,
            status: "minecraft:full".to_string(),
            last_update: 0,
            inhabited_time: 0,
            sections: vec![Section {
                y: -4,
                block_states: Some(BlockStates {
                    palette: vec![
                        BlockState::new("minecraft:air"),
                        BlockState::new("minecraft:oak_wood").with_property("axis", "y"),
                    ],
                    data: Some(fastnbt::LongArray::new(vec![0; 256])),
                }),
                biomes: Some(Biomes { palette: vec!["minecraft:ocean".to_string()], data: None }),
            }],
        };

        let bytes = fastnbt::to_bytes(&chunk).unwrap();
        let decoded: ChunkData = fastnbt::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.x_pos, -2);
        assert_eq!(decoded.z_pos, 5);
        let states = decoded.sections[0].block_states.as_ref().unwrap();
        assert_eq!(states.palette[1].property("axis"), Some("y"));
        assert_eq!(states.data.as_ref().unwrap().len(), 256);
    }
}
