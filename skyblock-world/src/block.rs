//! Block-type registry: the block values this crate can store and persist.

use anyhow::{Context, Result, bail};
use skyblock_anvil::nbt::BlockState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WoodType {
    Oak,
    Birch,
    Spruce,
    Jungle,
}

impl WoodType {
    pub fn name(self) -> &'static str {
        match self {
            WoodType::Oak => "oak",
            WoodType::Birch => "birch",
            WoodType::Spruce => "spruce",
            WoodType::Jungle => "jungle",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "oak" => Some(WoodType::Oak),
            "birch" => Some(WoodType::Birch),
            "spruce" => Some(WoodType::Spruce),
            "jungle" => Some(WoodType::Jungle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Biome {
    #[default]
    Plains,
    Ocean,
}

impl Biome {
    pub fn name(self) -> &'static str {
        match self {
            Biome::Plains => "minecraft:plains",
            Biome::Ocean => "minecraft:ocean",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "minecraft:plains" => Some(Biome::Plains),
            "minecraft:ocean" => Some(Biome::Ocean),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Block {
    #[default]
    Air,
    Bedrock,
    Stone,
    Dirt,
    Grass,
    Water {
        still: bool,
        depth: u8,
    },
    Wood {
        wood: WoodType,
        stripped: bool,
        axis: Axis,
    },
    Leaves {
        wood: WoodType,
        persistent: bool,
        should_update: bool,
    },
}

impl Block {
    pub fn is_air(self) -> bool {
        self == Block::Air
    }

    /// Namespaced block state used by the chunk format.
    pub fn to_state(self) -> BlockState {
        match self {
            Block::Air => BlockState::new("minecraft:air"),
            Block::Bedrock => BlockState::new("minecraft:bedrock"),
            Block::Stone => BlockState::new("minecraft:stone"),
            Block::Dirt => BlockState::new("minecraft:dirt"),
            Block::Grass => BlockState::new("minecraft:grass_block"),
            Block::Water { still, depth } => BlockState::new("minecraft:water")
                .with_property("depth", depth)
                .with_property("still", still),
            Block::Wood { wood, stripped, axis } => {
                let prefix = if stripped { "stripped_" } else { "" };
                BlockState::new(format!("minecraft:{}{}_wood", prefix, wood.name()))
                    .with_property("axis", axis.name())
            }
            Block::Leaves { wood, persistent, should_update } => {
                BlockState::new(format!("minecraft:{}_leaves", wood.name()))
                    .with_property("persistent", persistent)
                    .with_property("update", should_update)
            }
        }
    }

    pub fn from_state(state: &BlockState) -> Result<Self> {
        let Some(name) = state.name.strip_prefix("minecraft:") else {
            bail!("unknown block namespace in {}", state.name);
        };

        let block = match name {
            "air" => Block::Air,
            "bedrock" => Block::Bedrock,
            "stone" => Block::Stone,
            "dirt" => Block::Dirt,
            "grass_block" => Block::Grass,
            "water" => Block::Water {
                still: flag(state, "still")?,
                depth: state
                    .property("depth")
                    .context("water without depth")?
                    .parse()
                    .context("bad water depth")?,
            },
            _ => {
                if let Some(wood) = name.strip_suffix("_leaves").and_then(WoodType::from_name) {
                    Block::Leaves {
                        wood,
                        persistent: flag(state, "persistent")?,
                        should_update: flag(state, "update")?,
                    }
                } else if let Some(base) = name.strip_suffix("_wood") {
                    let (stripped, base) = match base.strip_prefix("stripped_") {
                        Some(rest) => (true, rest),
                        None => (false, base),
                    };
                    let wood = WoodType::from_name(base).with_context(|| format!("unknown wood {}", base))?;
                    let axis = match state.property("axis") {
                        Some("x") => Axis::X,
                        Some("z") => Axis::Z,
                        _ => Axis::Y,
                    };
                    Block::Wood { wood, stripped, axis }
                } else {
                    bail!("unknown block {}", state.name);
                }
            }
        };
        Ok(block)
    }
}

fn flag(state: &BlockState, key: &str) -> Result<bool> {
    match state.property(key) {
        Some("true") => Ok(true),
        Some("false") | None => Ok(false),
        Some(other) => bail!("property {}={} on {} is not a boolean", key, other, state.name),
    }
}
