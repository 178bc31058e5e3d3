//! A single streamed terrain chunk

use std::sync::Arc;

use glam::{Vec2, Vec3};

use crate::core::{Error, GenerationStage, Result};
use crate::math::Aabb;
use crate::render::{MaterialId, NodeId, RenderObject};
use crate::streaming::coord::ChunkCoord;
use crate::streaming::provider::{ChunkDataProvider, Completion, EventSender};
use crate::terrain::{HeightMap, MeshData};

/// Where a chunk is in its two-stage generation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationState {
    /// Height data requested
    Pending,
    /// Height data received, mesh requested
    AwaitingMesh,
    /// Mesh attached; eligible for visibility
    Ready,
}

/// One addressable square of terrain.
///
/// Visibility is a flag on the render object and can be toggled in any
/// state, but [`TerrainChunk::update`] only ever shows a chunk once it is
/// [`GenerationState::Ready`].
pub struct TerrainChunk {
    coord: ChunkCoord,
    bounds: Aabb,
    state: GenerationState,
    object: RenderObject,
}

impl TerrainChunk {
    /// Create a hidden chunk and request its height data
    ///
    /// # Arguments
    /// * `coord` - Chunk coordinate
    /// * `size` - Chunk side length in world units
    /// * `render_parent` - Scene node the render object hangs under
    /// * `material` - Material for the terrain surface
    /// * `provider` - Generation backend
    /// * `events` - Channel the completion will be delivered on
    pub fn new<P: ChunkDataProvider + ?Sized>(
        coord: ChunkCoord,
        size: f32,
        render_parent: NodeId,
        material: MaterialId,
        provider: &P,
        events: &EventSender,
    ) -> Self {
        let anchor = coord.world_anchor(size);
        let bounds = Aabb::from_center_size(anchor, Vec2::splat(size));

        let mut object = RenderObject::new(format!("Terrain Chunk {}", coord), render_parent);
        object.set_position(Vec3::new(anchor.x, 0.0, anchor.y));
        object.set_material(material);

        let mut chunk = Self {
            coord,
            bounds,
            state: GenerationState::Pending,
            object,
        };
        chunk.set_visible(false);

        provider.request_data(coord, Completion::data(coord, events.clone()));
        chunk
    }

    /// Height data arrived; request the mesh
    pub fn on_data_ready<P: ChunkDataProvider + ?Sized>(
        &mut self,
        data: HeightMap,
        provider: &P,
        events: &EventSender,
    ) -> Result<()> {
        self.expect_state(GenerationState::Pending, GenerationStage::Data)?;

        self.state = GenerationState::AwaitingMesh;
        provider.request_mesh(data, Completion::mesh(self.coord, events.clone()));
        Ok(())
    }

    /// Mesh arrived; attach it
    pub fn on_mesh_ready(&mut self, mesh: MeshData) -> Result<()> {
        self.expect_state(GenerationState::AwaitingMesh, GenerationStage::Mesh)?;

        if mesh.is_empty() {
            log::warn!("Chunk {} received a mesh with no triangles", self.coord);
        }
        self.object.set_mesh(Arc::new(mesh));
        self.state = GenerationState::Ready;
        Ok(())
    }

    fn expect_state(&self, expected: GenerationState, stage: GenerationStage) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::UnexpectedCompletion {
                coord: self.coord,
                state: self.state,
                stage,
            })
        }
    }

    /// Recompute visibility from the observer's ground-plane position.
    ///
    /// Returns the distance from the observer to the nearest point of the
    /// chunk's bounds.
    pub fn update(&mut self, observer: Vec2, max_view_distance: f32) -> f32 {
        let distance = self.bounds.distance(observer);
        self.set_visible(self.is_ready() && distance <= max_view_distance);
        distance
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.object.set_active(visible);
    }

    pub fn is_visible(&self) -> bool {
        self.object.is_active()
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == GenerationState::Ready
    }

    pub fn render_object(&self) -> &RenderObject {
        &self.object
    }
}

impl std::fmt::Debug for TerrainChunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerrainChunk")
            .field("coord", &self.coord)
            .field("bounds", &self.bounds)
            .field("state", &self.state)
            .field("visible", &self.is_visible())
            .finish()
    }
}
