//! Generator configuration: defaults, JSON loading and validation.
//!
//! Every field has a default from [`crate::constants`], so a config file only
//! needs to name what it changes. Validation rejects bad values outright and
//! never clamps them.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;
use crate::corridor::ConnectionPoints;
use crate::random::RandomPolicy;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Explicit seed; `None` derives one from the clock when a session starts
    pub seed: Option<u64>,
    pub random: RandomPolicy,
    pub scatter: ScatterConfig,
    pub routing: RoutingConfig,
    pub rooms: RoomConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    pub count: usize,
    pub radius: f32,
    /// `[min, max]` height of volume centers
    pub vertical_range: [f32; 2],
    pub size_min: [f32; 3],
    pub size_max: [f32; 3],
    pub mean_factor: f32,
    /// Seconds to wait for the overlap resolver before discarding volumes
    pub overlap_timeout: f32,
    /// Route and furnish every surviving volume instead of only Main ones
    pub include_small_tiles: bool,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            count: SCATTER_DEFAULT_COUNT,
            radius: SCATTER_DEFAULT_RADIUS,
            vertical_range: [
                SCATTER_DEFAULT_VERTICAL_RANGE.0,
                SCATTER_DEFAULT_VERTICAL_RANGE.1,
            ],
            size_min: SCATTER_DEFAULT_SIZE_MIN,
            size_max: SCATTER_DEFAULT_SIZE_MAX,
            mean_factor: SCATTER_DEFAULT_MEAN_FACTOR,
            overlap_timeout: SCATTER_DEFAULT_OVERLAP_TIMEOUT,
            include_small_tiles: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub path_width: f32,
    pub min_length_for_path: f32,
    pub min_length_for_corner: f32,
    pub rows: usize,
    pub columns: usize,
    pub add_branching: bool,
    pub branch_count: usize,
    pub connection_points: ConnectionPoints,
    /// Coordinates closer than this count as aligned when deciding on a corner
    pub align_tolerance: f32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            path_width: CORRIDOR_DEFAULT_PATH_WIDTH,
            min_length_for_path: CORRIDOR_DEFAULT_MIN_LENGTH_FOR_PATH,
            min_length_for_corner: CORRIDOR_DEFAULT_MIN_LENGTH_FOR_CORNER,
            rows: MESH_DEFAULT_ROWS,
            columns: MESH_DEFAULT_COLUMNS,
            add_branching: true,
            branch_count: CORRIDOR_DEFAULT_BRANCH_COUNT,
            connection_points: ConnectionPoints::default(),
            align_tolerance: CORRIDOR_DEFAULT_ALIGN_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    pub minimum_regular_rooms: usize,
    pub extra_modifier_chance: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            minimum_regular_rooms: ROOMS_DEFAULT_MINIMUM_REGULAR,
            extra_modifier_chance: ROOMS_DEFAULT_EXTRA_MODIFIER_CHANCE,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse generator config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read generator config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

impl GeneratorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// The configured seed, or one derived from the clock.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_nanos() as u64)
                .unwrap_or_default()
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let RandomPolicy::Biased { roll_count, .. } = self.random {
            if roll_count == 0 {
                return Err(invalid("random.roll_count", "must be at least 1"));
            }
        }
        self.scatter.validate()?;
        self.routing.validate()?;
        Ok(())
    }
}

impl ScatterConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(invalid("scatter.radius", format!("{} is not positive", self.radius)));
        }
        let [low, high] = self.vertical_range;
        if !low.is_finite() || !high.is_finite() || low > high {
            return Err(invalid(
                "scatter.vertical_range",
                format!("[{low}, {high}] is not an ordered range"),
            ));
        }
        for axis in 0..3 {
            let (min, max) = (self.size_min[axis], self.size_max[axis]);
            if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
                return Err(invalid(
                    "scatter.size_min",
                    format!("axis {axis}: [{min}, {max}] must be positive and ordered"),
                ));
            }
        }
        if !self.mean_factor.is_finite() || self.mean_factor < SCATTER_MIN_MEAN_FACTOR {
            return Err(invalid(
                "scatter.mean_factor",
                format!("{} is below {}", self.mean_factor, SCATTER_MIN_MEAN_FACTOR),
            ));
        }
        if !self.overlap_timeout.is_finite() || self.overlap_timeout < 0.0 {
            return Err(invalid(
                "scatter.overlap_timeout",
                format!("{} is negative", self.overlap_timeout),
            ));
        }
        Ok(())
    }
}

impl RoutingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.path_width.is_finite() || self.path_width <= 0.0 {
            return Err(invalid("routing.path_width", format!("{} is not positive", self.path_width)));
        }
        if !self.min_length_for_path.is_finite() || self.min_length_for_path < 0.0 {
            return Err(invalid("routing.min_length_for_path", "must be zero or more"));
        }
        if !self.min_length_for_corner.is_finite() || self.min_length_for_corner < 0.0 {
            return Err(invalid("routing.min_length_for_corner", "must be zero or more"));
        }
        if self.rows < MESH_MIN_ROWS {
            return Err(invalid(
                "routing.rows",
                format!("{} is below {}", self.rows, MESH_MIN_ROWS),
            ));
        }
        if self.columns < MESH_MIN_COLUMNS {
            return Err(invalid(
                "routing.columns",
                format!("{} is below {}", self.columns, MESH_MIN_COLUMNS),
            ));
        }
        if !self.align_tolerance.is_finite() || self.align_tolerance < 0.0 {
            return Err(invalid("routing.align_tolerance", "must be zero or more"));
        }
        Ok(())
    }
}
