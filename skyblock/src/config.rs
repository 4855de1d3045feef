use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use skyblock_storage::Compression;

#[derive(Parser, Debug)]
#[command(name = "skyblock", about = "Bootstraps skyblock island worlds")]
pub struct Args {
    /// Starter tree: oak, birch, spruce or jungle. Anything else means oak.
    #[arg(short, long, env = "SKYBLOCK_TREE_TYPE", default_value = "oak")]
    pub tree_type: String,

    /// Directory holding one sub-directory per world
    #[arg(short = 'd', long, env = "SKYBLOCK_DIR", default_value = "skyblock")]
    pub world_dir: PathBuf,

    /// World to create or reopen at startup (repeatable)
    #[arg(short, long = "world", default_value = "skyblock")]
    pub worlds: Vec<String>,

    /// Base seed; taken from OS entropy when absent
    #[arg(short, long, env = "SKYBLOCK_SEED")]
    pub seed: Option<u64>,

    #[arg(short, long, value_enum, default_value = "zlib")]
    pub compression: CompressionArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CompressionArg {
    Zlib,
    None,
}

impl From<CompressionArg> for Compression {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::Zlib => Compression::Zlib,
            CompressionArg::None => Compression::None,
        }
    }
}
