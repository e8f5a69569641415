//! Optional JSON run configuration.
//!
//! ```json
//! { "seed": 7, "end_time_secs": 600, "descriptor": "trips.pass", "output_dir": "output/shuttle" }
//! ```
//!
//! Every field is optional; missing fields keep their defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub seed:          u64,
    /// Hard stop, in simulated seconds.
    pub end_time_secs: u64,
    /// Passenger descriptor file.  The built-in trip list is used when unset.
    pub descriptor:    Option<PathBuf>,
    pub output_dir:    PathBuf,
    /// Seconds the car takes per floor.
    pub floor_secs:    f64,
    /// Seconds the doors stay open after the last traversal.
    pub dwell_secs:    f64,
    /// Weight limit, in passengers.
    pub capacity:      i32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed:          42,
            end_time_secs: 900,
            descriptor:    None,
            output_dir:    PathBuf::from("output/shuttle"),
            floor_secs:    1.5,
            dwell_secs:    3.0,
            capacity:      6,
        }
    }
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}
