use thiserror::Error;

use crate::distribution::{compute_plan, DistributionPlan, PlanError, MAX_AVERAGE, MIN_AVERAGE};
use crate::form::FormInspector;
use crate::prefs::PreferenceStore;

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("could not find element with id: {id}")]
    MissingElement { id: String },

    #[error("failed to remember rating: {0:#}")]
    Storage(anyhow::Error),
}

/// Result of a successful application.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyOutcome {
    pub target: f64,
    pub plan: DistributionPlan,
}

/// Parse a user-entered target average.
///
/// Anything that is not a finite number in [1, 5] is rejected the same way
/// `compute_plan` rejects it.
pub fn parse_target(input: &str) -> Result<f64, PlanError> {
    let value = input
        .trim()
        .parse::<f64>()
        .map_err(|_| PlanError::InvalidInput {
            value: input.trim().to_string(),
        })?;
    if !value.is_finite() || !(MIN_AVERAGE..=MAX_AVERAGE).contains(&value) {
        return Err(PlanError::InvalidInput {
            value: value.to_string(),
        });
    }
    Ok(value)
}

/// Fill `form` so its ratings average `target`, then remember `target` under `storage_key`.
///
/// Every option is looked up and the preference written before the form is touched, so
/// any failure leaves the form as it was and the stored preference is only written once
/// the plan is known to fit the form.
pub fn apply_evaluation<F, P>(
    target: f64,
    form: &mut F,
    prefs: &mut P,
    storage_key: &str,
) -> Result<ApplyOutcome, ApplyError>
where
    F: FormInspector + ?Sized,
    P: PreferenceStore + ?Sized,
{
    let plan = compute_plan(target, form.question_count())?;

    let options = plan
        .iter()
        .map(|(question, score)| {
            form.find_option(question, score)
                .ok_or_else(|| ApplyError::MissingElement {
                    id: form.option_label(question, score),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    prefs
        .set(storage_key, target)
        .map_err(ApplyError::Storage)?;

    form.clear_selections();
    for option in options {
        form.select(option);
    }

    tracing::info!(
        target_average = target,
        questions = plan.len(),
        split = %plan.summary(),
        "applied evaluation"
    );

    Ok(ApplyOutcome { target, plan })
}
