use thiserror::Error;

/// Reasons a target average cannot be turned into a distribution plan.
///
/// All variants are terminal: retrying with the same inputs gives the same result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("target average '{value}' must be a valid number between 1 and 5")]
    InvalidInput { value: String },

    #[error("no questions found on the page")]
    NoQuestions,

    #[error("target average {target} is not achievable with {questions} questions")]
    Unachievable { target: f64, questions: usize },
}
