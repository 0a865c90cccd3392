use super::config::RandomizerConfig;

pub const MIN_JITTER_FACTOR: f64 = 1.0;
pub const MAX_JITTER_FACTOR: f64 = 2.0;

pub fn jitter_in_range(jitter: f64) -> bool {
    (MIN_JITTER_FACTOR..=MAX_JITTER_FACTOR).contains(&jitter)
}

/// Validate randomizer configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_randomizer(config: &RandomizerConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(jitter) = config.jitter_factor {
        if !jitter_in_range(jitter) {
            errors.push(format!(
                "randomizer.jitter_factor: {} is outside {} - {}",
                jitter, MIN_JITTER_FACTOR, MAX_JITTER_FACTOR
            ));
        }
    }

    if config.max_iterations == Some(0) {
        errors.push("randomizer.max_iterations: must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
