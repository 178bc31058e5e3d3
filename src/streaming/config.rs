//! Streaming configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::render::{MaterialId, NodeId};
use crate::terrain::TerrainParams;

/// Default maximum distance at which a chunk is shown, in world units
pub const DEFAULT_MAX_VIEW_DISTANCE: f32 = 450.0;

/// Configuration for a terrain streamer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Nearest-surface distance beyond which chunks are hidden
    pub max_view_distance: f32,
    /// Scene node every chunk's render object is parented to
    pub render_parent: NodeId,
    /// Material applied to every chunk
    pub material: MaterialId,
    /// Maximum concurrent generation jobs for the threaded provider
    pub worker_threads: usize,
    /// Terrain noise and mesh parameters
    pub terrain: TerrainParams,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            max_view_distance: DEFAULT_MAX_VIEW_DISTANCE,
            render_parent: NodeId::default(),
            material: MaterialId::default(),
            worker_threads: 4,
            terrain: TerrainParams::default(),
        }
    }
}

impl StreamingConfig {
    /// Check values are usable
    pub fn validate(&self) -> Result<()> {
        if !(self.max_view_distance.is_finite() && self.max_view_distance > 0.0) {
            return Err(Error::Config(format!(
                "max_view_distance must be positive and finite, got {}", self.max_view_distance
            )));
        }
        if self.worker_threads == 0 {
            return Err(Error::Config("worker_threads must be at least 1".into()));
        }
        self.terrain.validate()
    }

    /// Load from a JSON file and validate
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to a JSON file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_is_valid() {
        let config = StreamingConfig::default();
        assert_eq!(config.max_view_distance, 450.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_view_distance() {
        for bad in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let config = StreamingConfig { max_view_distance: bad, ..Default::default() };
            assert!(matches!(config.validate(), Err(Error::Config(_))), "accepted {}", bad);
        }
    }

    #[test]
    fn test_validate_checks_terrain() {
        let mut config = StreamingConfig::default();
        config.terrain.resolution = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("nested").join("streaming.json");

        let config = StreamingConfig {
            max_view_distance: 300.0,
            material: MaterialId(9),
            terrain: TerrainParams { seed: 7, ..Default::default() },
            ..Default::default()
        };
        config.save(&path).expect("save failed");

        let loaded = StreamingConfig::load(&path).expect("load failed");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("partial.json");
        std::fs::write(&path, r#"{ "max_view_distance": 200.0, "terrain": { "seed": 3 } }"#)
            .expect("write failed");

        let loaded = StreamingConfig::load(&path).expect("load failed");
        assert_eq!(loaded.max_view_distance, 200.0);
        assert_eq!(loaded.terrain.seed, 3);
        assert_eq!(loaded.terrain.resolution, 241);
        assert_eq!(loaded.worker_threads, 4);
    }

    #[test]
    fn test_load_errors() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");

        let missing = StreamingConfig::load(&temp_dir.path().join("missing.json"));
        assert!(matches!(missing, Err(Error::Io(_))));

        let path = temp_dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").expect("write failed");
        assert!(matches!(StreamingConfig::load(&path), Err(Error::Json(_))));

        let path = temp_dir.path().join("invalid.json");
        std::fs::write(&path, r#"{ "max_view_distance": -5.0 }"#).expect("write failed");
        assert!(matches!(StreamingConfig::load(&path), Err(Error::Config(_))));
    }
}
