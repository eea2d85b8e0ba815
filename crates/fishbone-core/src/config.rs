//! Workspace configuration
//!
//! [`FishboneConfig`] is read from TOML. Every key is optional:
//!
//! ```toml
//! default_problem_title = "Problem"
//!
//! [layout]
//! spacing = 260.0
//!
//! [snapshot]
//! app_name = "Fishbone Analyzer"
//!
//! [advisory]
//! timeout_secs = 30
//! ```

use crate::error::{FishboneError, Result};
use fishbone_layout::LayoutConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Header values stamped on exported snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotSettings {
    /// `metadata.appName`
    pub app_name: String,
    /// `metadata.version`
    pub format_version: String,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            app_name: "Fishbone Analyzer".to_string(),
            format_version: "1.0".to_string(),
        }
    }
}

/// Advisory boundary settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorySettings {
    /// Deadline for one advisor reply
    pub timeout_secs: u64,
}

impl Default for AdvisorySettings {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FishboneConfig {
    /// Layout geometry
    pub layout: LayoutConfig,
    /// Snapshot header
    pub snapshot: SnapshotSettings,
    /// Title of the placeholder problem laid down when a category arrives first
    pub default_problem_title: String,
    /// Advisory boundary
    pub advisory: AdvisorySettings,
}

impl Default for FishboneConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            snapshot: SnapshotSettings::default(),
            default_problem_title: "Problem".to_string(),
            advisory: AdvisorySettings::default(),
        }
    }
}

impl FishboneConfig {
    /// Parse and validate TOML
    ///
    /// # Errors
    /// `Toml` for syntax or type errors, `Geometry`/`InvalidConfig` for
    /// out-of-range values
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// `Io` if the file cannot be read, otherwise as [`Self::from_toml_str`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| FishboneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Check every value is usable
    ///
    /// # Errors
    /// First invalid value found
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        if self.advisory.timeout_secs == 0 {
            return Err(FishboneError::InvalidConfig(
                "advisory.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.default_problem_title.trim().is_empty() {
            return Err(FishboneError::InvalidConfig(
                "default_problem_title must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
