//! Configuration system

pub use serde::{Deserialize, Serialize};

use crate::spatial::BvhConfig;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Tuning knobs for index construction and query behavior
///
/// The defaults are right for typical zones; a settings file is only worth
/// carrying for unusually dense meshes or tighter epsilon requirements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Maximum triangles per BVH leaf before a node is split
    pub max_leaf_triangles: usize,

    /// Maximum BVH depth
    pub max_depth: u32,

    /// Slack added above a best-Z query's start height so a surface exactly
    /// at the queried height is still found
    pub surface_epsilon: f32,

    /// Distance from either endpoint within which a line-of-sight hit is
    /// treated as self-intersection and ignored
    pub endpoint_epsilon: f32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_leaf_triangles: 8,
            max_depth: 32,
            surface_epsilon: 0.001,
            endpoint_epsilon: 0.01,
        }
    }
}

impl EngineSettings {
    /// The BVH construction parameters these settings describe
    pub fn bvh_config(&self) -> BvhConfig {
        BvhConfig {
            max_leaf_triangles: self.max_leaf_triangles,
            max_depth: self.max_depth,
        }
    }
}

impl Config for EngineSettings {}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("zone_engine_{}_{name}", std::process::id()))
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.max_leaf_triangles, 8);
        assert!(settings.surface_epsilon > 0.0);
        assert_eq!(settings.bvh_config().max_depth, settings.max_depth);
    }

    #[test]
    fn test_toml_round_trip() {
        let path = temp_path("settings.toml");
        let settings = EngineSettings {
            max_leaf_triangles: 4,
            ..Default::default()
        };
        settings.save_to_file(&path).unwrap();

        let loaded = EngineSettings::load_from_file(&path).unwrap();
        assert_eq!(loaded.max_leaf_triangles, 4);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_ron_round_trip() {
        let path = temp_path("settings.ron");
        let settings = EngineSettings {
            max_depth: 16,
            ..Default::default()
        };
        settings.save_to_file(&path).unwrap();

        let loaded = EngineSettings::load_from_file(&path).unwrap();
        assert_eq!(loaded.max_depth, 16);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_unsupported_format() {
        let err = EngineSettings::load_from_file("settings.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }
}
