//! Observer-driven terrain chunk streaming

pub mod coord;
pub mod config;
pub mod provider;
pub mod chunk;
pub mod registry;
pub mod scheduler;

pub use coord::{round_to_int, ChunkCoord};
pub use config::{StreamingConfig, DEFAULT_MAX_VIEW_DISTANCE};
pub use provider::{
    event_channel, ChunkDataProvider, Completion, EventReceiver, EventSender,
    GenerationEvent, InlineProvider, ThreadedProvider,
};
pub use chunk::{GenerationState, TerrainChunk};
pub use registry::ChunkRegistry;
pub use scheduler::{StreamStats, TerrainStreamer};
