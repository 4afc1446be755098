//! Per-invocation parse options.

use serde::Deserialize;

use crate::error::BoardTextError;
use crate::gerber::CoordinateFormat;

/// Default proximity threshold for glyph clustering, in millimeters.
pub const DEFAULT_CLUSTER_THRESHOLD_MM: f64 = 5.0;

/// Clusters with fewer members than this are treated as noise.
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 3;

/// How the clusterer finds neighbouring points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterStrategy {
    /// Compare every later point against every member.
    #[default]
    Linear,
    /// Bucket points in a uniform grid sized to the threshold.
    Grid,
}

/// Options for one parse. The starting format has no implicit default: pick
/// [`ParseOptions::outline`] or [`ParseOptions::silkscreen`], or build one.
///
/// When deserialized, `format` is required and the clustering fields fall
/// back to their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ParseOptions {
    /// Format in effect until the file's own `%FS` directive is seen.
    pub format: CoordinateFormat,
    /// Maximum member distance (exclusive) for cluster absorption.
    #[serde(default = "default_cluster_threshold")]
    pub cluster_threshold_mm: f64,
    /// Smallest retained cluster.
    #[serde(default = "default_min_cluster_size")]
    pub min_cluster_size: usize,
    /// Neighbour search strategy.
    #[serde(default)]
    pub strategy: ClusterStrategy,
}

const fn default_cluster_threshold() -> f64 {
    DEFAULT_CLUSTER_THRESHOLD_MM
}

const fn default_min_cluster_size() -> usize {
    DEFAULT_MIN_CLUSTER_SIZE
}

impl ParseOptions {
    /// Options for board outline layers (2.2 format).
    pub const fn outline() -> Self {
        Self::with_format(CoordinateFormat::outline())
    }

    /// Options for silkscreen layers (2.5 format).
    pub const fn silkscreen() -> Self {
        Self::with_format(CoordinateFormat::silkscreen())
    }

    /// Default clustering settings with an explicit starting format.
    pub const fn with_format(format: CoordinateFormat) -> Self {
        Self {
            format,
            cluster_threshold_mm: DEFAULT_CLUSTER_THRESHOLD_MM,
            min_cluster_size: DEFAULT_MIN_CLUSTER_SIZE,
            strategy: ClusterStrategy::Linear,
        }
    }

    /// Rejects options no parse could use.
    ///
    /// # Errors
    ///
    /// Returns [`BoardTextError::InvalidOptions`] for a non-finite or
    /// non-positive threshold, or a zero minimum cluster size.
    pub fn validate(&self) -> Result<(), BoardTextError> {
        if !self.cluster_threshold_mm.is_finite() || self.cluster_threshold_mm <= 0.0 {
            return Err(BoardTextError::InvalidOptions(format!(
                "cluster threshold must be a positive number of millimeters, got {}",
                self.cluster_threshold_mm
            )));
        }
        if self.min_cluster_size == 0 {
            return Err(BoardTextError::InvalidOptions(
                "minimum cluster size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
