//! Fill course-evaluation surveys so the ratings average a chosen target.
//!
//! The arithmetic lives in [`distribution`]; [`form`] and [`prefs`] are the
//! collaborators it is applied through, [`apply`] ties them together and
//! [`fill`] runs that against a page on disk.

pub mod apply;
pub mod config;
pub mod distribution;
pub mod fill;
pub mod form;
pub mod output;
pub mod prefs;
pub mod prompt;

pub use apply::{apply_evaluation, parse_target, ApplyError, ApplyOutcome};
pub use distribution::{compute_plan, DistributionPlan, PlanError, Score};
pub use fill::{fill_page, resolve_preset, FillError, FillReport, FillRequest};
