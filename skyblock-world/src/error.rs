use thiserror::Error;

use crate::pos::BlockPos;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("position {pos} is outside the build height of world {world}")]
    OutOfBounds { world: String, pos: BlockPos },

    #[error("world {0} is read-only")]
    ReadOnly(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
