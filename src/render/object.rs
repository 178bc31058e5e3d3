//! Renderer-facing chunk objects
//!
//! The streamer only writes to these; a renderer reads them each frame and
//! draws the active ones. Geometry is never read back.

use std::sync::Arc;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::terrain::MeshData;

/// Handle to a node in the renderer's scene hierarchy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Handle to a material owned by the renderer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub u32);

/// A named, positioned, toggleable mesh slot
#[derive(Clone, Debug)]
pub struct RenderObject {
    name: String,
    parent: NodeId,
    position: Vec3,
    material: MaterialId,
    mesh: Option<Arc<MeshData>>,
    active: bool,
}

impl RenderObject {
    /// Create an active object with no mesh attached
    pub fn new(name: impl Into<String>, parent: NodeId) -> Self {
        Self {
            name: name.into(),
            parent,
            position: Vec3::ZERO,
            material: MaterialId::default(),
            mesh: None,
            active: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> NodeId {
        self.parent
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn set_material(&mut self, material: MaterialId) {
        self.material = material;
    }

    pub fn mesh(&self) -> Option<&Arc<MeshData>> {
        self.mesh.as_ref()
    }

    /// Attach (or replace) the mesh
    pub fn set_mesh(&mut self, mesh: Arc<MeshData>) {
        self.mesh = Some(mesh);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Whether a renderer should draw this object this frame
    pub fn is_drawable(&self) -> bool {
        self.active && self.mesh.is_some()
    }
}
