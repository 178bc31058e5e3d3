//! Chunk data providers
//!
//! A provider turns a chunk coordinate into a height map, and a height map
//! into a mesh, off the main thread. Results come back as
//! [`GenerationEvent`]s on a channel that the streamer drains during its own
//! update, so chunk state is only ever touched on the thread that owns it.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::runtime::{Handle, Runtime};
use tokio::sync::mpsc;

use crate::core::{GenerationStage, Result};
use crate::streaming::coord::ChunkCoord;
use crate::terrain::{HeightMap, MeshData, TerrainGenerator, TerrainParams};

/// A finished generation step, addressed to the chunk that requested it
#[derive(Debug)]
pub enum GenerationEvent {
    DataReady { coord: ChunkCoord, data: HeightMap },
    MeshReady { coord: ChunkCoord, mesh: MeshData },
}

impl GenerationEvent {
    /// Chunk the result belongs to
    pub fn coord(&self) -> ChunkCoord {
        match self {
            GenerationEvent::DataReady { coord, .. } => *coord,
            GenerationEvent::MeshReady { coord, .. } => *coord,
        }
    }
}

/// Sending half of the completion channel
pub type EventSender = mpsc::UnboundedSender<GenerationEvent>;
/// Receiving half of the completion channel
pub type EventReceiver = mpsc::UnboundedReceiver<GenerationEvent>;

/// Create a completion channel
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// One-shot completion handle for a generation request.
///
/// `complete` consumes the handle, so a request can be answered at most once.
pub struct Completion<T> {
    coord: ChunkCoord,
    tx: EventSender,
    wrap: fn(ChunkCoord, T) -> GenerationEvent,
}

impl Completion<HeightMap> {
    /// Completion for a height map request
    pub fn data(coord: ChunkCoord, tx: EventSender) -> Self {
        Self {
            coord,
            tx,
            wrap: |coord, data| GenerationEvent::DataReady { coord, data },
        }
    }
}

impl Completion<MeshData> {
    /// Completion for a mesh request
    pub fn mesh(coord: ChunkCoord, tx: EventSender) -> Self {
        Self {
            coord,
            tx,
            wrap: |coord, mesh| GenerationEvent::MeshReady { coord, mesh },
        }
    }
}

impl<T> Completion<T> {
    /// Chunk this completion answers
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Deliver the result to the owning streamer
    pub fn complete(self, value: T) {
        if self.tx.send((self.wrap)(self.coord, value)).is_err() {
            log::debug!("Dropping generation result for chunk {}: streamer is gone", self.coord);
        }
    }
}

impl<T> std::fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("coord", &self.coord)
            .finish()
    }
}

/// Source of chunk height data and meshes.
///
/// Requests for different chunks may complete in any order. Each request must
/// complete at most once, which [`Completion`] enforces by value.
pub trait ChunkDataProvider {
    /// Native vertices per chunk side
    fn chunk_resolution(&self) -> u32;

    /// Produce the height map for `coord`
    fn request_data(&self, coord: ChunkCoord, done: Completion<HeightMap>);

    /// Triangulate a previously produced height map
    fn request_mesh(&self, data: HeightMap, done: Completion<MeshData>);
}

/// Provider running generation on a tokio blocking thread pool
pub struct ThreadedProvider {
    generator: Arc<TerrainGenerator>,
    handle: Handle,
    /// Jobs submitted but not yet finished
    in_flight: Arc<AtomicUsize>,
    /// Dedicated runtime (None when borrowing the caller's runtime)
    runtime: Option<Runtime>,
}

impl ThreadedProvider {
    /// Create a provider with its own runtime
    ///
    /// # Arguments
    /// * `params` - Terrain generation parameters
    /// * `worker_threads` - Maximum number of concurrent generation jobs
    pub fn new(params: TerrainParams, worker_threads: usize) -> Result<Self> {
        params.validate()?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(worker_threads.max(1))
            .thread_name("terrain-gen")
            .build()?;
        let handle = runtime.handle().clone();

        log::info!(
            "Terrain generation pool started: {} workers, resolution {}",
            worker_threads.max(1),
            params.resolution
        );

        Ok(Self {
            generator: Arc::new(TerrainGenerator::new(params)),
            handle,
            in_flight: Arc::new(AtomicUsize::new(0)),
            runtime: Some(runtime),
        })
    }

    /// Create a provider on an existing runtime
    ///
    /// This is useful when the caller already has a tokio runtime active.
    pub fn with_handle(params: TerrainParams, handle: Handle) -> Result<Self> {
        params.validate()?;

        Ok(Self {
            generator: Arc::new(TerrainGenerator::new(params)),
            handle,
            in_flight: Arc::new(AtomicUsize::new(0)),
            runtime: None,
        })
    }

    /// The shared generator
    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    /// Number of submitted jobs that have not finished
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run `job` on the blocking pool and reap it on the runtime.
    ///
    /// A panicking job loses its completion; the panic is logged and the
    /// in-flight count still drops.
    fn spawn<F>(&self, coord: ChunkCoord, stage: GenerationStage, job: F)
    where
        F: FnOnce(&TerrainGenerator) + Send + 'static,
    {
        let generator = Arc::clone(&self.generator);
        let in_flight = Arc::clone(&self.in_flight);
        in_flight.fetch_add(1, Ordering::AcqRel);

        let task = self.handle.spawn_blocking(move || job(&generator));
        self.handle.spawn(async move {
            let result = task.await;
            in_flight.fetch_sub(1, Ordering::AcqRel);
            if let Err(e) = result {
                log::error!("Terrain {} job for chunk {} failed: {}", stage, coord, e);
            }
        });
    }
}

impl ChunkDataProvider for ThreadedProvider {
    fn chunk_resolution(&self) -> u32 {
        self.generator.params().resolution
    }

    fn request_data(&self, coord: ChunkCoord, done: Completion<HeightMap>) {
        self.spawn(coord, GenerationStage::Data, move |generator| {
            let map = generator.generate_height_map(coord);
            let (min_h, max_h) = map.range();
            log::trace!("Generated height map for chunk {} (heights {:.3}..{:.3})", coord, min_h, max_h);
            done.complete(map);
        });
    }

    fn request_mesh(&self, data: HeightMap, done: Completion<MeshData>) {
        self.spawn(data.coord, GenerationStage::Mesh, move |generator| {
            let mesh = generator.build_mesh(&data);
            log::trace!("Built mesh for chunk {} ({} triangles)", data.coord, mesh.triangle_count());
            done.complete(mesh);
        });
    }
}

impl Drop for ThreadedProvider {
    fn drop(&mut self) {
        // Unfinished jobs keep running; their completions find a closed channel.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

/// Provider that generates on the calling thread.
///
/// Results still travel through the completion channel, so they are applied
/// on the streamer's next drain exactly like threaded results.
pub struct InlineProvider {
    generator: TerrainGenerator,
}

impl InlineProvider {
    pub fn new(params: TerrainParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { generator: TerrainGenerator::new(params) })
    }

    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }
}

impl ChunkDataProvider for InlineProvider {
    fn chunk_resolution(&self) -> u32 {
        self.generator.params().resolution
    }

    fn request_data(&self, coord: ChunkCoord, done: Completion<HeightMap>) {
        done.complete(self.generator.generate_height_map(coord));
    }

    fn request_mesh(&self, data: HeightMap, done: Completion<MeshData>) {
        done.complete(self.generator.build_mesh(&data));
    }
}
