//! On-disk chunk format: NBT structures, paletted block states and the
//! compressed blob framing used by the world providers.
//!
//! A framed chunk blob looks like `[length:4][compression:1][payload:N]`,
//! where `length` counts the compression byte plus the payload.

use std::io::{Read, Write};

use anyhow::{Context, Result, bail};
use flate2::Compression as ZlibLevel;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

pub mod nbt;
pub mod palette;

/// Compression applied to chunk payloads before they reach storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    Zlib,
    None,
}

impl Compression {
    /// Compression type byte as written in the blob header.
    pub fn id(self) -> u8 {
        match self {
            Compression::Zlib => 2,
            Compression::None => 3,
        }
    }

    pub fn from_id(id: u8) -> Result<Self> {
        match id {
            2 => Ok(Compression::Zlib),
            3 => Ok(Compression::None),
            other => bail!("unsupported chunk compression type {}", other),
        }
    }
}

/// Compress raw NBT bytes and prefix them with the blob header.
pub fn compress_and_wrap_chunk(nbt_data: &[u8], compression: Compression) -> Result<Vec<u8>> {
    let payload = match compression {
        Compression::Zlib => {
            let mut encoder = ZlibEncoder::new(Vec::new(), ZlibLevel::default());
            encoder.write_all(nbt_data).context("Failed to compress chunk")?;
            encoder.finish().context("Failed to finish compression")?
        }
        Compression::None => nbt_data.to_vec(),
    };

    let mut result = Vec::with_capacity(5 + payload.len());
    let total_len = (payload.len() + 1) as u32;
    result.extend_from_slice(&total_len.to_be_bytes());
    result.push(compression.id());
    result.extend_from_slice(&payload);
    Ok(result)
}

/// Reverse of [`compress_and_wrap_chunk`]: validates the header and returns the raw NBT bytes.
pub fn unwrap_and_decompress(blob: &[u8]) -> Result<Vec<u8>> {
    if blob.len() < 5 {
        bail!("chunk blob too short ({} bytes)", blob.len());
    }
    let total_len = u32::from_be_bytes([blob[0], blob[1], blob[2], blob[3]]) as usize;
    if total_len == 0 || 4 + total_len > blob.len() {
        bail!("chunk blob length {} does not fit in {} bytes", total_len, blob.len());
    }
    let compression = Compression::from_id(blob[4])?;
    let payload = &blob[5..4 + total_len];

    match compression {
        Compression::Zlib => {
            let mut decoder = ZlibDecoder::new(payload);
            let mut out = Vec::new();
            decoder.read_to_end(&mut out).context("Failed to decompress chunk")?;
            Ok(out)
        }
        Compression::None => Ok(payload.to_vec()),
    }
}
