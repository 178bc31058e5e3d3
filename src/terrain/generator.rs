//! Noise-based height map generation

use glam::Vec2;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use super::mesh::MeshData;
use crate::core::{Error, Result};
use crate::streaming::coord::ChunkCoord;

/// Parameters controlling terrain generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    pub seed: u32,
    pub resolution: u32,       // Vertices per chunk side; chunk size is one less
    pub noise_scale: f32,      // Horizontal scale (larger = smoother)
    pub octaves: u32,          // FBM octaves (detail levels)
    pub persistence: f32,      // FBM persistence (0.5 typical)
    pub lacunarity: f32,       // FBM lacunarity (2.0 typical)
    pub height_multiplier: f32, // Vertical scale applied when meshing
    pub offset: Vec2,          // World-space noise offset
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 12345,
            resolution: 241,
            noise_scale: 80.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            height_multiplier: 30.0,
            offset: Vec2::ZERO,
        }
    }
}

impl TerrainParams {
    /// Reject values that would produce an empty or degenerate chunk
    pub fn validate(&self) -> Result<()> {
        if self.resolution < 2 {
            return Err(Error::Config(format!(
                "terrain resolution must be at least 2, got {}", self.resolution
            )));
        }
        if !self.noise_scale.is_finite() || self.noise_scale <= 0.0 {
            return Err(Error::Config(format!(
                "noise_scale must be positive, got {}", self.noise_scale
            )));
        }
        if self.octaves == 0 {
            return Err(Error::Config("octaves must be at least 1".into()));
        }
        Ok(())
    }

    /// Side length of one chunk in world units.
    ///
    /// Neighbouring chunks share their border row of vertices.
    pub fn chunk_size(&self) -> u32 {
        self.resolution - 1
    }
}

/// Square grid of normalised heights for one chunk, row-major.
///
/// Row `0` is the chunk's +Z edge; column `0` is its -X edge.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightMap {
    pub coord: ChunkCoord,
    pub resolution: u32,
    pub heights: Vec<f32>,
}

impl HeightMap {
    /// Height at grid cell (x, y), in `[0, 1]`
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.heights[(y * self.resolution + x) as usize]
    }

    /// Lowest and highest sample
    pub fn range(&self) -> (f32, f32) {
        let min_h = self.heights.iter().copied().fold(f32::INFINITY, f32::min);
        let max_h = self.heights.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        (min_h, max_h)
    }
}

/// Procedural terrain generator using fractal Brownian motion (FBM).
///
/// Holds only read-only state, so one instance can serve any number of
/// concurrent requests for distinct chunks.
pub struct TerrainGenerator {
    params: TerrainParams,
    noise: Fbm<Perlin>,
}

impl TerrainGenerator {
    /// Create a new terrain generator with the given parameters
    pub fn new(params: TerrainParams) -> Self {
        let noise = Fbm::<Perlin>::new(params.seed)
            .set_octaves(params.octaves as usize)
            .set_persistence(params.persistence as f64)
            .set_lacunarity(params.lacunarity as f64);

        Self { params, noise }
    }

    /// Get terrain parameters
    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Normalised terrain height in `[0, 1]` at world position (x, z)
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let nx = ((x + self.params.offset.x) / self.params.noise_scale) as f64;
        let nz = ((z + self.params.offset.y) / self.params.noise_scale) as f64;

        let noise_value = self.noise.get([nx, nz]);
        (((noise_value + 1.0) / 2.0) as f32).clamp(0.0, 1.0)
    }

    /// Sample the height map for one chunk
    pub fn generate_height_map(&self, coord: ChunkCoord) -> HeightMap {
        let resolution = self.params.resolution;
        let size = self.params.chunk_size() as f32;
        let anchor = coord.world_anchor(size);
        let half = size * 0.5;

        let mut heights = Vec::with_capacity((resolution * resolution) as usize);
        for y in 0..resolution {
            let z = anchor.y + half - y as f32;
            for x in 0..resolution {
                let wx = anchor.x - half + x as f32;
                heights.push(self.height_at(wx, z));
            }
        }

        HeightMap { coord, resolution, heights }
    }

    /// Triangulate a height map with this generator's vertical scale
    pub fn build_mesh(&self, map: &HeightMap) -> MeshData {
        MeshData::from_height_map(map, self.params.height_multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params() -> TerrainParams {
        TerrainParams { resolution: 9, ..Default::default() }
    }

    #[test]
    fn test_terrain_params_default() {
        let params = TerrainParams::default();
        assert_eq!(params.seed, 12345);
        assert_eq!(params.resolution, 241);
        assert_eq!(params.chunk_size(), 240);
        assert_eq!(params.octaves, 4);
        assert_eq!(params.persistence, 0.5);
        assert_eq!(params.lacunarity, 2.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_res = TerrainParams { resolution: 1, ..Default::default() };
        assert!(matches!(bad_res.validate(), Err(Error::Config(_))));

        let bad_scale = TerrainParams { noise_scale: 0.0, ..Default::default() };
        assert!(matches!(bad_scale.validate(), Err(Error::Config(_))));

        let bad_octaves = TerrainParams { octaves: 0, ..Default::default() };
        assert!(matches!(bad_octaves.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_height_at_range_and_consistency() {
        let generator = TerrainGenerator::new(TerrainParams::default());
        let positions = [(0.0, 0.0), (50.0, 50.0), (100.0, 100.0), (-50.0, -50.0)];

        for (x, z) in positions {
            let h1 = generator.height_at(x, z);
            let h2 = generator.height_at(x, z);
            assert_eq!(h1, h2, "Height should be consistent at ({}, {})", x, z);
            assert!((0.0..=1.0).contains(&h1));
        }
    }

    #[test]
    fn test_different_seeds() {
        let gen1 = TerrainGenerator::new(TerrainParams { seed: 1, ..Default::default() });
        let gen2 = TerrainGenerator::new(TerrainParams { seed: 2, ..Default::default() });

        let m1 = gen1.generate_height_map(ChunkCoord::new(0, 0));
        let m2 = gen2.generate_height_map(ChunkCoord::new(0, 0));
        assert_ne!(m1.heights, m2.heights);
    }

    #[test]
    fn test_height_map_dimensions() {
        let generator = TerrainGenerator::new(small_params());
        let map = generator.generate_height_map(ChunkCoord::new(3, -2));

        assert_eq!(map.coord, ChunkCoord::new(3, -2));
        assert_eq!(map.resolution, 9);
        assert_eq!(map.heights.len(), 81);
        let (min_h, max_h) = map.range();
        assert!(min_h >= 0.0 && max_h <= 1.0 && min_h <= max_h);
    }

    #[test]
    fn test_neighbouring_chunks_share_border() {
        let generator = TerrainGenerator::new(small_params());
        let left = generator.generate_height_map(ChunkCoord::new(0, 0));
        let right = generator.generate_height_map(ChunkCoord::new(1, 0));

        let last = left.resolution - 1;
        for y in 0..left.resolution {
            assert_eq!(left.get(last, y), right.get(0, y));
        }
    }

    #[test]
    fn test_height_map_deterministic() {
        let a = TerrainGenerator::new(small_params()).generate_height_map(ChunkCoord::new(7, 7));
        let b = TerrainGenerator::new(small_params()).generate_height_map(ChunkCoord::new(7, 7));
        assert_eq!(a, b);
    }
}
