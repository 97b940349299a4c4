use std::fmt;

/// A single question's rating on the 1-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(u8);

impl Score {
    pub const MIN: Score = Score(1);
    pub const MAX: Score = Score(5);

    /// Build a score, returning `None` outside 1..=5.
    pub fn new(value: u8) -> Option<Self> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Some(Score(value))
        } else {
            None
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Every score from lowest to highest.
    pub fn all() -> impl Iterator<Item = Score> {
        (Self::MIN.0..=Self::MAX.0).map(Score)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
