pub mod config;
pub mod engine;
pub mod validation;

pub use config::RandomizerConfig;
pub use engine::{Outcome, Randomizer};
pub use validation::validate_randomizer;
