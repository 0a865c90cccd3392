use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::randomizer::RandomizerConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Transmutation table file; the bundled reference table when unset
    #[serde(default)]
    pub transmutation_table: Option<PathBuf>,

    #[serde(default)]
    pub randomizer: Option<RandomizerConfig>,

    /// Fixed RNG seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
}
