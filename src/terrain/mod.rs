//! Procedural terrain generation

pub mod generator;
pub use generator::{HeightMap, TerrainGenerator, TerrainParams};

pub mod mesh;
pub use mesh::MeshData;
