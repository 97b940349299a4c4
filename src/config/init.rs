use anyhow::Result;
use std::path::PathBuf;

use super::{get_config_path, save_config, validate_config, Config, FormConfig};
use crate::distribution::{MAX_AVERAGE, MIN_AVERAGE};
use crate::prompt::{prompt_with_default, prompt_yes_no};

/// Parse a single rating, requiring it to lie in [1, 5].
fn parse_rating(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", s.trim()))?;
    if !value.is_finite() || !(MIN_AVERAGE..=MAX_AVERAGE).contains(&value) {
        return Err(format!("{} must be between 1 and 5", value));
    }
    Ok(value)
}

/// Parse a comma-separated preset list such as "2, 2.5, 3".
/// "none" or an empty string gives an empty list.
fn parse_presets(s: &str) -> Result<Vec<f64>, String> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("none") {
        return Ok(Vec::new());
    }
    s.split(',').map(parse_rating).collect()
}

fn format_presets(presets: &[f64]) -> String {
    presets
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the suggested config file path.
/// End of input at any prompt aborts without writing anything.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("PUP Survey Helper Configuration Wizard");
    println!("======================================");
    println!();

    let defaults = Config::default();

    println!("The default average is offered when no rating has been used yet.");
    let default_average = loop {
        let Some(input) =
            prompt_with_default("Default average (1-5)", &defaults.default_average.to_string())?
        else {
            println!("Aborted.");
            return Ok(());
        };
        match parse_rating(&input) {
            Ok(v) => break v,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    println!();
    println!("Presets are targets you can apply directly with `apply --preset N`.");
    let presets = loop {
        let Some(input) =
            prompt_with_default("Presets (comma-separated)", &format_presets(&defaults.presets))?
        else {
            println!("Aborted.");
            return Ok(());
        };
        match parse_presets(&input) {
            Ok(v) => break v,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    println!();
    println!("Question radios are grouped by their name prefix (the PUP survey uses 'q').");
    let question_prefix = loop {
        let Some(input) =
            prompt_with_default("Question name prefix", &defaults.form.question_prefix)?
        else {
            println!("Aborted.");
            return Ok(());
        };
        if !input.is_empty() {
            break input;
        }
        println!("  Prefix is required.");
    };

    let config = Config {
        default_average,
        presets,
        form: FormConfig {
            question_prefix,
            ..defaults.form.clone()
        },
        ..defaults
    };

    if let Err(errors) = validate_config(&config) {
        anyhow::bail!("Generated config is invalid: {}", errors.join("; "));
    }

    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let Some(path_str) = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?
    else {
        println!("Aborted.");
        return Ok(());
    };
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    save_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `pup-survey-helper apply --input <page.html>` to fill a survey.");

    Ok(())
}
