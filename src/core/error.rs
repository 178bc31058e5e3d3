//! Error types for terrain streaming

use thiserror::Error;

use crate::streaming::chunk::GenerationState;
use crate::streaming::coord::ChunkCoord;

/// Which half of a chunk's generation a completion belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationStage {
    Data,
    Mesh,
}

impl std::fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationStage::Data => f.write_str("data"),
            GenerationStage::Mesh => f.write_str("mesh"),
        }
    }
}

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected {stage} completion for chunk {coord} in state {state:?}")]
    UnexpectedCompletion {
        coord: ChunkCoord,
        state: GenerationState,
        stage: GenerationStage,
    },
}
