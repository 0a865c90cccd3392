use super::score::{round2, sum_scores, Score};
use crate::error::{GradeError, Result};

/// A weighted grading category (written works, performance tasks, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    scores: Vec<Score>,
    highest_total_score: u32,
    weight: f64,
    label: Option<String>,
}

impl Component {
    /// Build a component. When `highest_total_score` is `None` it defaults to
    /// the sum of `scores`, so the component is perfect by definition.
    /// `weight` must lie in (0, 1].
    pub fn new(
        scores: Vec<Score>,
        weight: f64,
        highest_total_score: Option<u32>,
        label: Option<String>,
    ) -> Result<Self> {
        if !(weight > 0.0 && weight <= 1.0) {
            return Err(GradeError::InvalidWeight(weight));
        }

        let sum = sum_scores(&scores);
        let highest = match highest_total_score {
            Some(h) => h,
            None => u32::try_from(sum).map_err(|_| GradeError::InvalidScore {
                sum,
                highest: u32::MAX,
            })?,
        };

        if sum > u64::from(highest) {
            return Err(GradeError::InvalidScore { sum, highest });
        }

        Ok(Self {
            scores,
            highest_total_score: highest,
            weight,
            label,
        })
    }

    pub fn scores(&self) -> &[Score] {
        &self.scores
    }

    pub fn highest_total_score(&self) -> u32 {
        self.highest_total_score
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn sum_scores(&self) -> u64 {
        sum_scores(&self.scores)
    }

    /// Whether `scores` would keep this component within its ceiling.
    pub fn accepts(&self, scores: &[Score]) -> bool {
        sum_scores(scores) <= u64::from(self.highest_total_score)
    }

    /// Swap in new scores. Callers check `accepts` first; the ceiling
    /// invariant is only enforced at construction.
    pub(crate) fn replace_scores(&mut self, scores: Vec<Score>) -> Vec<Score> {
        std::mem::replace(&mut self.scores, scores)
    }

    /// Percentage of the highest total score, two decimals. A zero ceiling
    /// reads as 0%.
    pub fn percentage(&self) -> f64 {
        if self.highest_total_score == 0 {
            return 0.0;
        }
        round2(self.sum_scores() as f64 / f64::from(self.highest_total_score) * 100.0)
    }

    pub fn weighted_average(&self) -> f64 {
        round2(self.percentage() * self.weight)
    }
}
