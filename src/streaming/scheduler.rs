//! Observer-driven chunk scheduling
//!
//! Each tick the streamer scans a square window of chunk coordinates around
//! the observer, creates chunks it has never seen, and shows or hides the
//! ones it already has. Chunks are never destroyed; chunks that drift out of
//! range are hidden.

use std::sync::Arc;

use glam::{Vec2, Vec3};

use crate::core::{Error, Result};
use crate::render::{MaterialId, NodeId, RenderObject};
use crate::streaming::chunk::{GenerationState, TerrainChunk};
use crate::streaming::config::StreamingConfig;
use crate::streaming::coord::{round_to_int, ChunkCoord};
use crate::streaming::provider::{
    event_channel, ChunkDataProvider, EventReceiver, EventSender, GenerationEvent,
};
use crate::streaming::registry::ChunkRegistry;

/// Largest window half-width whose side `2 * r + 1` still fits in an `i32`
pub const MAX_VIEW_RADIUS: i32 = (i32::MAX - 1) / 2;

/// Snapshot of streamer state for logging and tests
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Chunks ever created (never shrinks)
    pub resident: usize,
    /// Chunks shown by the last tick
    pub visible: usize,
    pub awaiting_data: usize,
    pub awaiting_mesh: usize,
    pub ready: usize,
    pub ticks: u64,
}

/// Streams terrain chunks around a single observer.
///
/// Not thread-safe by construction: generation results only reach chunk
/// state through [`TerrainStreamer::process_completions`], which runs on
/// whichever thread owns the streamer.
pub struct TerrainStreamer<P: ChunkDataProvider> {
    provider: Arc<P>,
    registry: ChunkRegistry,
    events_tx: EventSender,
    events_rx: EventReceiver,
    max_view_distance: f32,
    chunk_size: f32,
    view_radius: i32,
    render_parent: NodeId,
    material: MaterialId,
    observer: Vec2,
    ticks: u64,
}

impl<P: ChunkDataProvider> TerrainStreamer<P> {
    /// Create a streamer from a configuration and a provider
    ///
    /// Chunk size is the provider's native resolution minus the one vertex
    /// shared with each neighbour.
    pub fn new(config: &StreamingConfig, provider: Arc<P>) -> Result<Self> {
        config.validate()?;
        let resolution = provider.chunk_resolution();
        if resolution < 2 {
            return Err(Error::Config(format!(
                "provider chunk resolution must be at least 2, got {}", resolution
            )));
        }

        let chunk_size = (resolution - 1) as f32;
        let view_radius = round_to_int(config.max_view_distance / chunk_size);
        if view_radius > MAX_VIEW_RADIUS {
            return Err(Error::Config(format!(
                "max_view_distance {} spans more than {} chunks at chunk size {}",
                config.max_view_distance, MAX_VIEW_RADIUS, chunk_size
            )));
        }
        let (events_tx, events_rx) = event_channel();

        log::info!(
            "Terrain streamer: chunk size {}, view distance {}, scanning {}x{} chunks",
            chunk_size,
            config.max_view_distance,
            2 * view_radius + 1,
            2 * view_radius + 1
        );

        Ok(Self {
            provider,
            registry: ChunkRegistry::new(),
            events_tx,
            events_rx,
            max_view_distance: config.max_view_distance,
            chunk_size,
            view_radius,
            render_parent: config.render_parent,
            material: config.material,
            observer: Vec2::ZERO,
            ticks: 0,
        })
    }

    /// Advance one simulation step
    pub fn tick(&mut self, observer_world_position: Vec3) {
        self.process_completions();

        self.observer = Vec2::new(observer_world_position.x, observer_world_position.z);
        self.update_visible_chunks();
        self.ticks += 1;
    }

    fn update_visible_chunks(&mut self) {
        self.registry.hide_visible();

        let current = self.current_chunk_coord();
        let r = self.view_radius;

        for dy in -r..=r {
            for dx in -r..=r {
                let Some(candidate) = current.checked_offset(dx, dy) else {
                    continue;
                };

                if let Some(chunk) = self.registry.get_mut(candidate) {
                    chunk.update(self.observer, self.max_view_distance);
                    if chunk.is_visible() {
                        self.registry.mark_visible(candidate);
                    }
                } else {
                    log::debug!("Creating chunk {}", candidate);
                    let chunk = TerrainChunk::new(
                        candidate,
                        self.chunk_size,
                        self.render_parent,
                        self.material,
                        self.provider.as_ref(),
                        &self.events_tx,
                    );
                    self.registry.insert(chunk);
                }
            }
        }
    }

    /// Apply every generation result that has arrived so far.
    ///
    /// Returns the number of results applied. Results for unknown chunks or
    /// arriving out of order are logged and dropped.
    pub fn process_completions(&mut self) -> usize {
        let mut applied = 0;

        while let Ok(event) = self.events_rx.try_recv() {
            let coord = event.coord();
            let Some(chunk) = self.registry.get_mut(coord) else {
                log::warn!("Discarding generation result for unknown chunk {}", coord);
                continue;
            };

            let outcome = match event {
                GenerationEvent::DataReady { data, .. } => {
                    log::trace!("Height data ready for chunk {}", coord);
                    chunk.on_data_ready(data, self.provider.as_ref(), &self.events_tx)
                }
                GenerationEvent::MeshReady { mesh, .. } => {
                    log::trace!("Mesh ready for chunk {}", coord);
                    chunk.on_mesh_ready(mesh)
                }
            };

            match outcome {
                Ok(()) => applied += 1,
                Err(e) => log::warn!("Discarding generation result: {}", e),
            }
        }

        applied
    }

    /// Observer position on the ground plane as of the last tick
    pub fn observer_position(&self) -> Vec2 {
        self.observer
    }

    /// Chunk the observer is standing nearest to
    pub fn current_chunk_coord(&self) -> ChunkCoord {
        ChunkCoord::from_world_pos(self.observer, self.chunk_size)
    }

    /// Half-width of the scan window, in chunks
    pub fn view_radius_in_chunks(&self) -> i32 {
        self.view_radius
    }

    pub fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    pub fn max_view_distance(&self) -> f32 {
        self.max_view_distance
    }

    /// Chunks shown by the last tick, in scan order
    pub fn visible_chunks(&self) -> &[ChunkCoord] {
        self.registry.visible_last_update()
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&TerrainChunk> {
        self.registry.get(coord)
    }

    pub fn chunk_count(&self) -> usize {
        self.registry.len()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Render objects for every chunk, shown or not
    pub fn render_objects(&self) -> impl Iterator<Item = &RenderObject> {
        self.registry.iter().map(|c| c.render_object())
    }

    pub fn stats(&self) -> StreamStats {
        StreamStats {
            resident: self.registry.len(),
            visible: self.registry.visible_last_update().len(),
            awaiting_data: self.registry.count_in_state(GenerationState::Pending),
            awaiting_mesh: self.registry.count_in_state(GenerationState::AwaitingMesh),
            ready: self.registry.count_in_state(GenerationState::Ready),
            ticks: self.ticks,
        }
    }

    #[cfg(test)]
    fn events_sender(&self) -> EventSender {
        self.events_tx.clone()
    }
}
