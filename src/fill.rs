use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::apply::{apply_evaluation, ApplyError, ApplyOutcome};
use crate::config::Config;
use crate::form::HtmlForm;
use crate::prefs::{MemoryPreferenceStore, PreferenceStore};

#[derive(Debug, Error)]
pub enum FillError {
    #[error("Invalid preset {index}. Must be between 1 and {available}.")]
    InvalidPreset { index: usize, available: usize },

    #[error(transparent)]
    Apply(#[from] ApplyError),

    #[error("{0:#}")]
    Io(anyhow::Error),
}

/// One `apply` run against a saved survey page.
#[derive(Debug, Clone)]
pub struct FillRequest<'a> {
    pub target: f64,
    pub input: &'a Path,
    /// Defaults to rewriting `input` in place.
    pub output: Option<&'a Path>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FillReport {
    pub outcome: ApplyOutcome,
    /// Where the filled page went; `None` for a dry run.
    pub written: Option<PathBuf>,
}

/// Look up a 1-based preset.
pub fn resolve_preset(presets: &[f64], index: usize) -> Result<f64, FillError> {
    index
        .checked_sub(1)
        .and_then(|i| presets.get(i))
        .copied()
        .ok_or(FillError::InvalidPreset {
            index,
            available: presets.len(),
        })
}

/// Load the page, fill it to `request.target` and write it out.
///
/// The rating is applied against an in-memory store and only copied into `prefs`
/// after the page has been saved, so a failed save remembers nothing. A dry run
/// writes neither.
pub fn fill_page<P>(
    request: &FillRequest,
    config: &Config,
    prefs: &mut P,
) -> Result<FillReport, FillError>
where
    P: PreferenceStore + ?Sized,
{
    let mut form = HtmlForm::load(request.input, &config.form).map_err(FillError::Io)?;

    let mut staged = MemoryPreferenceStore::new();
    let outcome = apply_evaluation(request.target, &mut form, &mut staged, &config.storage_key)?;

    if request.dry_run {
        tracing::debug!("dry run; leaving page and remembered rating untouched");
        return Ok(FillReport {
            outcome,
            written: None,
        });
    }

    let destination = request.output.unwrap_or(request.input);
    form.save(destination).map_err(FillError::Io)?;
    prefs
        .set(&config.storage_key, request.target)
        .map_err(FillError::Io)?;
    tracing::debug!(path = %destination.display(), "wrote filled survey page");

    Ok(FillReport {
        outcome,
        written: Some(destination.to_path_buf()),
    })
}
