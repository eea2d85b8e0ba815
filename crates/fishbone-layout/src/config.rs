//! Layout geometry

use serde::{Deserialize, Serialize};

/// Fixed geometry constants for spine and rib placement
///
/// Missing keys fall back to [`LayoutConfig::default`] when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// x of the tail sentinel in a freshly laid backbone
    pub origin_x: f64,
    /// Spine baseline y; separates the above and below slots
    pub spine_y: f64,
    /// y of categories in the above slot
    pub top_row_y: f64,
    /// y of categories in the below slot
    pub bottom_row_y: f64,
    /// How far left of its spine joint a category sits
    pub rib_offset: f64,
    /// Horizontal gap between consecutive spine joints
    pub spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: 80.0,
            spine_y: 300.0,
            top_row_y: 80.0,
            bottom_row_y: 520.0,
            rib_offset: 120.0,
            spacing: 260.0,
        }
    }
}

impl LayoutConfig {
    /// With spacing
    #[inline]
    #[must_use]
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// With rib offset
    #[inline]
    #[must_use]
    pub fn with_rib_offset(mut self, rib_offset: f64) -> Self {
        self.rib_offset = rib_offset;
        self
    }

    /// Check the geometry can produce a valid diagram
    ///
    /// # Errors
    /// `ConfigError` naming the first inconsistent constant
    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            self.origin_x,
            self.spine_y,
            self.top_row_y,
            self.bottom_row_y,
            self.rib_offset,
            self.spacing,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::NotFinite);
        }
        if !(self.top_row_y < self.spine_y && self.spine_y < self.bottom_row_y) {
            return Err(ConfigError::RowsNotAroundBaseline {
                top: self.top_row_y,
                baseline: self.spine_y,
                bottom: self.bottom_row_y,
            });
        }
        if self.spacing <= 0.0 {
            return Err(ConfigError::NonPositiveSpacing(self.spacing));
        }
        if self.rib_offset < 0.0 {
            return Err(ConfigError::NegativeRibOffset(self.rib_offset));
        }
        Ok(())
    }
}

/// Inconsistent layout constants
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// NaN or infinite constant
    #[error("layout constants must be finite")]
    NotFinite,

    /// Rows do not straddle the baseline
    #[error("rows must straddle the baseline: top {top} < baseline {baseline} < bottom {bottom}")]
    RowsNotAroundBaseline {
        /// Top row y
        top: f64,
        /// Baseline y
        baseline: f64,
        /// Bottom row y
        bottom: f64,
    },

    /// Spine would not grow to the right
    #[error("spacing must be positive, got {0}")]
    NonPositiveSpacing(f64),

    /// Categories would sit right of their joint
    #[error("rib offset must not be negative, got {0}")]
    NegativeRibOffset(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(LayoutConfig::default().validate().is_ok());
    }

    #[test]
    fn rows_must_straddle_baseline() {
        let config = LayoutConfig {
            top_row_y: 400.0,
            ..LayoutConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RowsNotAroundBaseline { .. })
        ));
    }

    #[test]
    fn spacing_must_be_positive() {
        let config = LayoutConfig::default().with_spacing(0.0);
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveSpacing(0.0)));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: LayoutConfig = toml::from_str("spacing = 300.0").unwrap();
        assert_eq!(config.spacing, 300.0);
        assert_eq!(config.spine_y, LayoutConfig::default().spine_y);
    }
}
