use crate::distribution::Score;

/// Handle to one selectable answer option, as handed out by a [`FormInspector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OptionRef(pub usize);

/// Read/write view over a survey form.
///
/// Questions are numbered from 1. Implementations own the mapping from
/// `(question, score)` to whatever element represents that answer.
pub trait FormInspector {
    /// Number of answerable questions currently on the form.
    fn question_count(&self) -> usize;

    /// Locate the option that gives `question` the rating `score`.
    fn find_option(&self, question: usize, score: Score) -> Option<OptionRef>;

    /// Human-readable name of the element `find_option` looks for, used in errors.
    fn option_label(&self, question: usize, score: Score) -> String;

    /// Deselect every option on the form.
    fn clear_selections(&mut self);

    fn select(&mut self, option: OptionRef);
}
