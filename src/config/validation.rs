use super::schema::Config;
use crate::distribution::{MAX_AVERAGE, MIN_AVERAGE};

fn in_rating_range(value: f64) -> bool {
    value.is_finite() && (MIN_AVERAGE..=MAX_AVERAGE).contains(&value)
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if !in_rating_range(config.default_average) {
        errors.push(format!(
            "default_average: {} must be between 1 and 5",
            config.default_average
        ));
    }

    for (i, preset) in config.presets.iter().enumerate() {
        if !in_rating_range(*preset) {
            errors.push(format!("presets[{}]: {} must be between 1 and 5", i, preset));
        }
    }

    if config.storage_key.trim().is_empty() {
        errors.push("storage_key: must not be empty".to_string());
    }

    if config.form.question_prefix.is_empty() {
        errors.push("form.question_prefix: must not be empty".to_string());
    }

    if !(2..=5).contains(&config.form.scale_size) {
        errors.push(format!(
            "form.scale_size: {} must be between 2 and 5",
            config.form.scale_size
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
