use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{GlanceError, Result};

/// Top-level configuration for the Glance extraction core.
///
/// Loaded from `~/.glance/config.toml` by default. Each section corresponds
/// to one component of the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlanceConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
}

impl GlanceConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GlanceConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| GlanceError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Data directory for extraction records and caches.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.glance/data".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Extraction admission and result-cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum images processed concurrently.
    pub max_concurrent: usize,
    /// Maximum entries retained in the completion cache.
    pub cache_max_entries: usize,
    /// Hours before a completion-cache entry expires.
    pub cache_ttl_hours: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 2,
            cache_max_entries: 100,
            cache_ttl_hours: 24,
        }
    }
}

/// Object-detection post-processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Overlap score above which two same-subject proposals are merged.
    pub overlap_threshold: f32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            overlap_threshold: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GlanceConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.extraction.max_concurrent, 2);
        assert_eq!(config.extraction.cache_max_entries, 100);
        assert_eq!(config.extraction.cache_ttl_hours, 24);
        assert!((config.detection.overlap_threshold - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let config = GlanceConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.extraction.max_concurrent, 2);
    }

    #[test]
    fn test_partial_toml_uses_section_defaults() {
        let toml_str = r#"
            [extraction]
            max_concurrent = 4
        "#;
        let config: GlanceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.extraction.max_concurrent, 4);
        // Unspecified fields and sections keep their defaults
        assert_eq!(config.extraction.cache_max_entries, 100);
        assert_eq!(config.general.log_level, "info");
        assert!((config.detection.overlap_threshold - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = GlanceConfig::default();
        config.extraction.max_concurrent = 8;
        config.extraction.cache_ttl_hours = 1;
        config.detection.overlap_threshold = 0.75;
        config.save(&path).unwrap();

        let loaded = GlanceConfig::load(&path).unwrap();
        assert_eq!(loaded.extraction.max_concurrent, 8);
        assert_eq!(loaded.extraction.cache_ttl_hours, 1);
        assert!((loaded.detection.overlap_threshold - 0.75).abs() < f32::EPSILON);
    }

    #[test]
    fn test_load_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not [valid toml").unwrap();

        let err = GlanceConfig::load(&path).unwrap_err();
        assert!(matches!(err, GlanceError::Config(_)));
    }
}
