use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use pup_survey_helper::config::{self, Config};
use pup_survey_helper::output;
use pup_survey_helper::prefs::{self, FilePreferenceStore, PreferenceStore};
use pup_survey_helper::{fill_page, resolve_preset, FillError, FillRequest};

const EXIT_SUCCESS: i32 = 0;
const EXIT_EVALUATION: i32 = 1;
const EXIT_CONFIG: i32 = 4;
const EXIT_IO: i32 = 5;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fill a saved survey page so its ratings average TARGET
    Apply {
        /// Desired average (1-5). Prompts with the last used rating when omitted
        target: Option<String>,

        /// Saved survey page (HTML)
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the filled page (defaults to overwriting --input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Use the N-th configured preset instead of TARGET (1-based)
        #[arg(short, long, conflicts_with = "target")]
        preset: Option<usize>,

        /// Compute and report without writing the page or the remembered rating
        #[arg(long)]
        dry_run: bool,
    },
    /// Show the per-question scores for TARGET without touching any page
    Plan {
        /// Desired average (1-5)
        target: String,

        /// Number of questions on the form
        #[arg(short, long)]
        questions: usize,
    },
    /// List configured presets and the last used rating
    Presets,
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "pup-survey-helper")]
#[command(about = "Fill PUP faculty evaluation surveys to a target average", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/pup-survey-helper/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the remembered-rating file (defaults to ~/.config/pup-survey-helper/prefs.json)
    #[arg(long, global = true)]
    prefs: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_with(code: i32, message: &str, use_colors: bool) -> ! {
    eprintln!("{}", output::format_error(message, use_colors));
    std::process::exit(code);
}

fn fill_exit_code(error: &FillError) -> i32 {
    match error {
        FillError::InvalidPreset { .. } => EXIT_CONFIG,
        FillError::Apply(_) => EXIT_EVALUATION,
        FillError::Io(_) => EXIT_IO,
    }
}

fn open_prefs(path: Option<PathBuf>, use_colors: bool) -> FilePreferenceStore {
    match FilePreferenceStore::open(path.unwrap_or_else(prefs::get_prefs_path)) {
        Ok(s) => s,
        Err(e) => exit_with(EXIT_IO, &format!("{:#}", e), use_colors),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let use_colors = output::should_use_colors();

    if matches!(cli.command, Commands::Init) {
        if let Err(e) = config::init::run_init_wizard(cli.config.map(PathBuf::from)) {
            exit_with(EXIT_CONFIG, &format!("{:#}", e), use_colors);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load and validate config
    let config_path = cli.config.map(PathBuf::from);
    let config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => exit_with(EXIT_CONFIG, &format!("Config error: {:#}", e), use_colors),
    };

    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    tracing::debug!(
        default_average = config.default_average,
        presets = config.presets.len(),
        prefix = %config.form.question_prefix,
        "loaded config"
    );

    // Only the commands that read the remembered rating open the preference file
    let prefs_path = cli.prefs;

    match cli.command {
        Commands::Apply {
            target,
            input,
            output: destination,
            preset,
            dry_run,
        } => {
            let mut store = open_prefs(prefs_path, use_colors);
            let last_used = store.get(&config.storage_key, config.default_average);

            let target = match resolve_target(&config, target, preset, last_used) {
                Ok(Some(t)) => t,
                // Prompt cancelled
                Ok(None) => std::process::exit(EXIT_SUCCESS),
                Err((code, message)) => exit_with(code, &message, use_colors),
            };

            let request = FillRequest {
                target,
                input: &input,
                output: destination.as_deref(),
                dry_run,
            };
            let report = match fill_page(&request, &config, &mut store) {
                Ok(r) => r,
                Err(e) => exit_with(fill_exit_code(&e), &e.to_string(), use_colors),
            };

            println!("{}", output::format_outcome(&report.outcome, use_colors));
            if dry_run {
                println!("(dry run: nothing written)");
            }
        }
        Commands::Plan { target, questions } => {
            let target = match pup_survey_helper::parse_target(&target) {
                Ok(t) => t,
                Err(e) => exit_with(EXIT_EVALUATION, &e.to_string(), use_colors),
            };
            match pup_survey_helper::compute_plan(target, questions) {
                Ok(plan) => println!("{}", output::format_plan_table(&plan, use_colors)),
                Err(e) => exit_with(EXIT_EVALUATION, &e.to_string(), use_colors),
            }
        }
        Commands::Presets => {
            let store = open_prefs(prefs_path, use_colors);
            let last_used = store.get(&config.storage_key, config.default_average);
            println!(
                "{}",
                output::format_presets(&config.presets, last_used, use_colors)
            );
        }
        // Handled before config loading
        Commands::Init => {}
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Work out the target from an explicit value, a preset, or an interactive prompt.
///
/// `Ok(None)` means the user cancelled the prompt.
fn resolve_target(
    config: &Config,
    target: Option<String>,
    preset: Option<usize>,
    last_used: f64,
) -> Result<Option<f64>, (i32, String)> {
    if let Some(index) = preset {
        return resolve_preset(&config.presets, index)
            .map(Some)
            .map_err(|e| (fill_exit_code(&e), e.to_string()));
    }

    let raw = match target {
        Some(t) => t,
        None => {
            let answer = pup_survey_helper::prompt::prompt_with_default(
                "Enter desired average (1-5)",
                &output::format_rating(last_used),
            )
            .map_err(|e| (EXIT_IO, format!("{:#}", e)))?;
            match answer {
                Some(a) => a,
                None => return Ok(None),
            }
        }
    };

    pup_survey_helper::parse_target(&raw)
        .map(Some)
        .map_err(|e| (EXIT_EVALUATION, e.to_string()))
}
