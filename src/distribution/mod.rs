pub mod error;
pub mod plan;
pub mod score;

pub use error::PlanError;
pub use plan::{compute_plan, DistributionPlan, MAX_AVERAGE, MIN_AVERAGE};
pub use score::Score;
