use serde::{Deserialize, Serialize};

/// A single graded item. `Missing` is an ungraded cell: it sums as 0 but is
/// what the randomizer is allowed to fill in when existing scores are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<u32>", into = "Option<u32>")]
pub enum Score {
    Present(u32),
    Missing,
}

impl Score {
    pub fn value(&self) -> Option<u32> {
        match self {
            Score::Present(v) => Some(*v),
            Score::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Score::Missing)
    }
}

impl From<Option<u32>> for Score {
    fn from(value: Option<u32>) -> Self {
        match value {
            Some(v) => Score::Present(v),
            None => Score::Missing,
        }
    }
}

impl From<Score> for Option<u32> {
    fn from(score: Score) -> Self {
        score.value()
    }
}

impl From<u32> for Score {
    fn from(value: u32) -> Self {
        Score::Present(value)
    }
}

/// Sum of present scores; missing ones count as zero.
pub fn sum_scores(scores: &[Score]) -> u64 {
    scores.iter().filter_map(Score::value).map(u64::from).sum()
}

/// Round to two decimals, half away from zero. Every percentage and average
/// in the crate goes through this.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2_half_away_from_zero() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(2.5), 2.5);
        assert_eq!(round2(12.344), 12.34);
        assert_eq!(round2(-0.125), -0.13);
    }

    #[test]
    fn test_round2_strips_float_noise() {
        assert_eq!(round2(0.1 + 0.2), 0.3);
        assert_eq!(round2(84.99999999999999), 85.0);
    }

    #[test]
    fn test_sum_ignores_missing() {
        let scores = vec![Score::Present(10), Score::Missing, Score::Present(5)];
        assert_eq!(sum_scores(&scores), 15);
        assert_eq!(sum_scores(&[]), 0);
    }

    #[test]
    fn test_score_json_uses_null_for_missing() {
        let scores = vec![Score::Present(7), Score::Missing];
        let json = serde_json::to_string(&scores).unwrap();
        assert_eq!(json, "[7,null]");
        let parsed: Vec<Score> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, scores);
    }
}
