use super::error::PlanError;
use super::score::Score;

/// Lowest accepted target average.
pub const MIN_AVERAGE: f64 = 1.0;
/// Highest accepted target average.
pub const MAX_AVERAGE: f64 = 5.0;

/// Ordered per-question scores realizing a target average.
///
/// Question indices are 1-based. The first `higher_count` questions get `higher`,
/// the rest get `lower`. `higher == lower` when the target is a whole number.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionPlan {
    lower: Score,
    higher: Score,
    higher_count: usize,
    scores: Vec<Score>,
}

impl DistributionPlan {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn scores(&self) -> &[Score] {
        &self.scores
    }

    /// Iterate `(question_index, score)` pairs with 1-based indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Score)> + '_ {
        self.scores.iter().enumerate().map(|(i, s)| (i + 1, *s))
    }

    /// Score for a 1-based question index.
    pub fn score_for(&self, question: usize) -> Option<Score> {
        question
            .checked_sub(1)
            .and_then(|i| self.scores.get(i))
            .copied()
    }

    pub fn lower(&self) -> Score {
        self.lower
    }

    pub fn higher(&self) -> Score {
        self.higher
    }

    pub fn higher_count(&self) -> usize {
        self.higher_count
    }

    pub fn lower_count(&self) -> usize {
        self.scores.len() - self.higher_count
    }

    pub fn is_uniform(&self) -> bool {
        self.lower == self.higher || self.higher_count == 0 || self.higher_count == self.len()
    }

    /// Sum of all assigned scores.
    pub fn total(&self) -> u64 {
        self.scores.iter().map(|s| u64::from(s.value())).sum()
    }

    pub fn mean(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.total() as f64 / self.scores.len() as f64
    }

    /// Compact description, e.g. "5 × 3 and 5 × 2".
    pub fn summary(&self) -> String {
        if self.lower == self.higher {
            format!("{} × {}", self.len(), self.lower)
        } else {
            format!(
                "{} × {} and {} × {}",
                self.higher_count,
                self.higher,
                self.lower_count(),
                self.lower
            )
        }
    }
}

/// Spread `target_average` over `question_count` questions using only the floor
/// and ceiling of the target.
///
/// The exact total is rounded with halves going away from zero; all totals here are
/// positive so this matches round-half-up.
pub fn compute_plan(
    target_average: f64,
    question_count: usize,
) -> Result<DistributionPlan, PlanError> {
    if !target_average.is_finite() || !(MIN_AVERAGE..=MAX_AVERAGE).contains(&target_average) {
        return Err(PlanError::InvalidInput {
            value: target_average.to_string(),
        });
    }

    if question_count == 0 {
        return Err(PlanError::NoQuestions);
    }

    let exact_total = target_average * question_count as f64;
    let rounded_total = exact_total.round() as i64;
    let lower_value = target_average.floor() as u8;
    let higher_value = target_average.ceil() as u8;
    let number_of_higher = rounded_total - i64::from(lower_value) * question_count as i64;

    let unachievable = || PlanError::Unachievable {
        target: target_average,
        questions: question_count,
    };

    if number_of_higher < 0 || number_of_higher > question_count as i64 {
        return Err(unachievable());
    }

    // Both bounds are inside [1, 5] once the target passed the range check.
    let lower = Score::new(lower_value).ok_or_else(unachievable)?;
    let higher = Score::new(higher_value).ok_or_else(unachievable)?;
    let higher_count = number_of_higher as usize;

    let scores = (0..question_count)
        .map(|i| if i < higher_count { higher } else { lower })
        .collect();

    Ok(DistributionPlan {
        lower,
        higher,
        higher_count,
        scores,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(plan: &DistributionPlan) -> Vec<u8> {
        plan.scores().iter().map(|s| s.value()).collect()
    }

    #[test]
    fn test_half_target_splits_evenly() {
        let plan = compute_plan(2.5, 10).unwrap();
        assert_eq!(plan.higher().value(), 3);
        assert_eq!(plan.lower().value(), 2);
        assert_eq!(plan.higher_count(), 5);
        assert_eq!(values(&plan), vec![3, 3, 3, 3, 3, 2, 2, 2, 2, 2]);
        assert_eq!(plan.total(), 25);
    }

    #[test]
    fn test_fractional_target_rounds_total() {
        // 3.7 * 3 = 11.1 -> 11 = 2*4 + 1*3
        let plan = compute_plan(3.7, 3).unwrap();
        assert_eq!(values(&plan), vec![4, 4, 3]);
        assert_eq!(plan.higher_count(), 2);
        assert_eq!(plan.lower_count(), 1);
    }

    #[test]
    fn test_below_range_is_invalid() {
        assert_eq!(
            compute_plan(0.5, 5),
            Err(PlanError::InvalidInput {
                value: "0.5".to_string()
            })
        );
    }

    #[test]
    fn test_above_range_is_invalid() {
        assert!(matches!(
            compute_plan(5.01, 5),
            Err(PlanError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_non_finite_is_invalid() {
        assert!(matches!(
            compute_plan(f64::NAN, 5),
            Err(PlanError::InvalidInput { .. })
        ));
        assert!(matches!(
            compute_plan(f64::INFINITY, 5),
            Err(PlanError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_zero_questions() {
        for target in [1.0, 2.5, 3.7, 5.0] {
            assert_eq!(compute_plan(target, 0), Err(PlanError::NoQuestions));
        }
    }

    #[test]
    fn test_target_checked_before_question_count() {
        assert!(matches!(
            compute_plan(7.0, 0),
            Err(PlanError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_bounds_are_uniform() {
        for n in 1..=40 {
            let low = compute_plan(1.0, n).unwrap();
            assert!(low.scores().iter().all(|s| s.value() == 1));
            let high = compute_plan(5.0, n).unwrap();
            assert!(high.scores().iter().all(|s| s.value() == 5));
            assert!(low.is_uniform() && high.is_uniform());
        }
    }

    #[test]
    fn test_whole_target_is_uniform() {
        for target in [1.0, 2.0, 3.0, 4.0, 5.0] {
            let plan = compute_plan(target, 17).unwrap();
            assert_eq!(plan.lower(), plan.higher());
            assert_eq!(f64::from(plan.lower().value()), target);
            assert_eq!(plan.higher_count(), 0);
            assert_eq!(plan.summary(), format!("17 × {}", target as u8));
        }
    }

    #[test]
    fn test_plan_shape_across_inputs() {
        for n in 1..=60usize {
            for step in 100..=500u32 {
                let target = f64::from(step) / 100.0;
                match compute_plan(target, n) {
                    Ok(plan) => {
                        assert_eq!(plan.len(), n);
                        assert_eq!(plan.higher_count() + plan.lower_count(), n);
                        assert!(plan.higher().value() - plan.lower().value() <= 1);
                        assert_eq!(u32::from(plan.lower().value()), target.floor() as u32);
                        assert_eq!(u32::from(plan.higher().value()), target.ceil() as u32);
                        let higher_seen = plan
                            .scores()
                            .iter()
                            .filter(|s| **s == plan.higher())
                            .count();
                        if plan.higher() != plan.lower() {
                            assert_eq!(higher_seen, plan.higher_count());
                        }
                        // Mean lands within half a point per question of the target.
                        let slack = 0.5 / n as f64 + 1e-9;
                        assert!(
                            (plan.mean() - target).abs() <= slack,
                            "target {} n {} mean {}",
                            target,
                            n,
                            plan.mean()
                        );
                    }
                    Err(e) => assert!(matches!(e, PlanError::Unachievable { .. })),
                }
            }
        }
    }

    #[test]
    fn test_higher_scores_come_first() {
        let plan = compute_plan(4.25, 8).unwrap();
        let first_lower = plan.scores().iter().position(|s| *s == plan.lower());
        assert_eq!(first_lower, Some(plan.higher_count()));
        assert!(plan.scores()[plan.higher_count()..]
            .iter()
            .all(|s| *s == plan.lower()));
    }

    #[test]
    fn test_same_inputs_same_plan() {
        assert_eq!(compute_plan(3.3, 27), compute_plan(3.3, 27));
    }

    #[test]
    fn test_iter_is_one_based() {
        let plan = compute_plan(3.7, 3).unwrap();
        let pairs: Vec<(usize, u8)> = plan.iter().map(|(q, s)| (q, s.value())).collect();
        assert_eq!(pairs, vec![(1, 4), (2, 4), (3, 3)]);
        assert_eq!(plan.score_for(0), None);
        assert_eq!(plan.score_for(3).map(Score::value), Some(3));
        assert_eq!(plan.score_for(4), None);
    }

    #[test]
    fn test_summary() {
        assert_eq!(compute_plan(2.5, 10).unwrap().summary(), "5 × 3 and 5 × 2");
    }
}
