//! Height map triangulation

use glam::{Vec2, Vec3};

use super::generator::HeightMap;

/// Renderable triangle mesh in chunk-local space.
///
/// The chunk's render object supplies the world translation, so vertex
/// positions are centred on the origin.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Build a regular grid mesh from a height map.
    ///
    /// Vertex `(x, y)` lands at local `(x - half, h * height_multiplier, half - y)`,
    /// two triangles per grid cell. Maps with fewer than two samples per side
    /// have no cells and give an empty mesh.
    pub fn from_height_map(map: &HeightMap, height_multiplier: f32) -> Self {
        let res = map.resolution;
        if res < 2 {
            return Self::default();
        }

        let half = (res - 1) as f32 * 0.5;
        let count = (res * res) as usize;
        let cells = (res - 1) as usize;

        let mut mesh = MeshData {
            vertices: Vec::with_capacity(count),
            uvs: Vec::with_capacity(count),
            indices: Vec::with_capacity(cells * cells * 6),
        };

        for y in 0..res {
            for x in 0..res {
                let height = map.get(x, y) * height_multiplier;
                mesh.vertices.push(Vec3::new(x as f32 - half, height, half - y as f32));
                mesh.uvs.push(Vec2::new(x as f32 / (res - 1) as f32, y as f32 / (res - 1) as f32));

                if x < res - 1 && y < res - 1 {
                    let i = y * res + x;
                    mesh.add_triangle(i, i + res + 1, i + res);
                    mesh.add_triangle(i + res + 1, i, i + 1);
                }
            }
        }

        mesh
    }

    fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the mesh has no geometry
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streaming::coord::ChunkCoord;

    fn flat_map(resolution: u32, height: f32) -> HeightMap {
        HeightMap {
            coord: ChunkCoord::new(0, 0),
            resolution,
            heights: vec![height; (resolution * resolution) as usize],
        }
    }

    #[test]
    fn test_counts() {
        let mesh = MeshData::from_height_map(&flat_map(5, 0.5), 10.0);
        assert_eq!(mesh.vertices.len(), 25);
        assert_eq!(mesh.uvs.len(), 25);
        assert_eq!(mesh.indices.len(), 4 * 4 * 6);
        assert_eq!(mesh.triangle_count(), 32);
        assert!(!mesh.is_empty());
    }

    #[test]
    fn test_vertices_centred_and_scaled() {
        let mesh = MeshData::from_height_map(&flat_map(5, 0.5), 10.0);
        assert_eq!(mesh.vertices[0], Vec3::new(-2.0, 5.0, 2.0));
        assert_eq!(mesh.vertices[24], Vec3::new(2.0, 5.0, -2.0));
        assert_eq!(mesh.uvs[24], Vec2::ONE);
    }

    #[test]
    fn test_indices_in_range() {
        let mesh = MeshData::from_height_map(&flat_map(4, 0.0), 1.0);
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
        assert_eq!(&mesh.indices[..6], &[0, 5, 4, 5, 0, 1]);
    }

    #[test]
    fn test_degenerate_maps_give_empty_mesh() {
        for resolution in [0, 1] {
            let mesh = MeshData::from_height_map(&flat_map(resolution, 0.5), 10.0);
            assert!(mesh.is_empty(), "resolution {}", resolution);
            assert!(mesh.vertices.is_empty() && mesh.uvs.is_empty());
        }
    }
}
