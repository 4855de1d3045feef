use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use skyblock_anvil::{Compression, compress_and_wrap_chunk, unwrap_and_decompress};

use crate::ChunkStorage;

const CHUNK_DIR: &str = "chunks";
const LEVEL_FILE: &str = "level.json";

/// Directory-backed provider. One framed blob per chunk under `chunks/`.
///
/// Opening an existing directory keeps everything already stored in it.
pub struct FsStorage {
    root: PathBuf,
    compression: Compression,
}

impl FsStorage {
    pub fn open(path: impl AsRef<Path>, compression: Compression) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        fs::create_dir_all(root.join(CHUNK_DIR))
            .with_context(|| format!("Failed to create world directory {}", root.display()))?;

        log::debug!("Opened world storage at {} ({:?})", root.display(), compression);
        Ok(Self { root, compression })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn chunk_path(&self, chunk_x: i32, chunk_z: i32) -> PathBuf {
        self.root.join(CHUNK_DIR).join(format!("c.{}.{}.dat", chunk_x, chunk_z))
    }
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

// Write through a sibling temp file so a crash never leaves a torn blob.
fn write_replace(path: &Path, data: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, data).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

impl ChunkStorage for FsStorage {
    fn read_chunk(&self, chunk_x: i32, chunk_z: i32) -> Result<Option<Vec<u8>>> {
        let path = self.chunk_path(chunk_x, chunk_z);
        match read_optional(&path)? {
            Some(blob) => {
                let nbt = unwrap_and_decompress(&blob)
                    .with_context(|| format!("Corrupt chunk {},{} in {}", chunk_x, chunk_z, path.display()))?;
                Ok(Some(nbt))
            }
            None => Ok(None),
        }
    }

    fn write_chunk(&self, chunk_x: i32, chunk_z: i32, data: &[u8]) -> Result<()> {
        let blob = compress_and_wrap_chunk(data, self.compression)?;
        write_replace(&self.chunk_path(chunk_x, chunk_z), &blob)
    }

    fn read_level(&self) -> Result<Option<Vec<u8>>> {
        read_optional(&self.root.join(LEVEL_FILE))
    }

    fn write_level(&self, data: &[u8]) -> Result<()> {
        write_replace(&self.root.join(LEVEL_FILE), data)
    }
}
