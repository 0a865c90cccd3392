use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_ITERATIONS: u64 = 100_000;
pub const DEFAULT_JITTER_FACTOR: f64 = 1.6;
pub const DEFAULT_AVERAGE_CEILING: u32 = 100;

/// Randomizer tunables.
///
/// Every field is optional in YAML; missing fields fall back to the defaults.
///
/// Example YAML:
/// ```yaml
/// randomizer:
///   max_iterations: 100000
///   jitter_factor: 1.6
///   overwrite_all: false
///   average_ceiling: 98
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RandomizerConfig {
    /// Number of full re-draws before giving up and rolling back
    #[serde(default)]
    pub max_iterations: Option<u64>,

    /// Draw window multiplier, 1.0 - 2.0. Each free score is drawn from
    /// `[round(jitter * max) - max, max]`, so 1.0 spans 0..max and 2.0 pins
    /// the score to max.
    #[serde(default)]
    pub jitter_factor: Option<f64>,

    /// Redraw every score (true) or only fill in missing ones (false)
    #[serde(default)]
    pub overwrite_all: Option<bool>,

    /// Students whose current transmuted average is above this are skipped
    #[serde(default)]
    pub average_ceiling: Option<u32>,
}

impl Default for RandomizerConfig {
    fn default() -> Self {
        Self {
            max_iterations: Some(DEFAULT_MAX_ITERATIONS),
            jitter_factor: Some(DEFAULT_JITTER_FACTOR),
            overwrite_all: Some(true),
            average_ceiling: Some(DEFAULT_AVERAGE_CEILING),
        }
    }
}

impl RandomizerConfig {
    pub fn max_iterations(&self) -> u64 {
        self.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS)
    }

    pub fn jitter_factor(&self) -> f64 {
        self.jitter_factor.unwrap_or(DEFAULT_JITTER_FACTOR)
    }

    pub fn overwrite_all(&self) -> bool {
        self.overwrite_all.unwrap_or(true)
    }

    pub fn average_ceiling(&self) -> u32 {
        self.average_ceiling.unwrap_or(DEFAULT_AVERAGE_CEILING)
    }
}
