use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::apply::ApplyOutcome;
use crate::distribution::DistributionPlan;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a rating with `f64`'s `Display`, which already prints 3.0 as "3".
pub fn format_rating(value: f64) -> String {
    value.to_string()
}

/// Success message after a plan has been applied to a form.
///
/// ```text
/// Set 10 questions to average 2.5
/// (5 × 3 and 5 × 2)
/// ```
pub fn format_outcome(outcome: &ApplyOutcome, use_colors: bool) -> String {
    let headline = format!(
        "Set {} questions to average {}",
        outcome.plan.len(),
        format_rating(outcome.target)
    );
    let detail = format!(
        "({} × {} and {} × {})",
        outcome.plan.higher_count(),
        outcome.plan.higher(),
        outcome.plan.lower_count(),
        outcome.plan.lower()
    );

    if use_colors {
        format!("{}\n{}", headline.green().bold(), detail.dimmed())
    } else {
        format!("{}\n{}", headline, detail)
    }
}

/// Error line shown when computing or applying a plan fails.
pub fn format_error(message: &str, use_colors: bool) -> String {
    if use_colors {
        format!("{} {}", "Error:".red().bold(), message)
    } else {
        format!("Error: {}", message)
    }
}

/// One line per question: "  Q{index}  {score}", followed by a summary line.
pub fn format_plan_table(plan: &DistributionPlan, use_colors: bool) -> String {
    let width = plan.len().to_string().len();
    let mut lines: Vec<String> = plan
        .iter()
        .map(|(question, score)| {
            let label = format!("Q{:<width$}", question, width = width);
            if use_colors && score == plan.higher() && plan.higher() != plan.lower() {
                format!("  {}  {}", label, score.to_string().cyan())
            } else {
                format!("  {}  {}", label, score)
            }
        })
        .collect();

    let footer = format!(
        "{} questions, total {}, mean {:.3} ({})",
        plan.len(),
        plan.total(),
        plan.mean(),
        plan.summary()
    );
    lines.push(String::new());
    if use_colors {
        lines.push(footer.bold().to_string());
    } else {
        lines.push(footer);
    }
    lines.join("\n")
}

/// Numbered preset list with the remembered rating underneath.
pub fn format_presets(presets: &[f64], last_used: f64, use_colors: bool) -> String {
    let mut lines = Vec::new();
    if presets.is_empty() {
        lines.push("No presets configured.".to_string());
    } else {
        for (i, preset) in presets.iter().enumerate() {
            let marker = if *preset == last_used { " (last used)" } else { "" };
            if use_colors {
                lines.push(format!(
                    "  {}. Set {}{}",
                    (i + 1).yellow(),
                    format_rating(*preset),
                    marker.dimmed()
                ));
            } else {
                lines.push(format!("  {}. Set {}{}", i + 1, format_rating(*preset), marker));
            }
        }
    }
    lines.push(format!("Last used rating: {}", format_rating(last_used)));
    lines.join("\n")
}
