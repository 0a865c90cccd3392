use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradeError {
    #[error("Transmutation table line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("No transmutation row covers average {0}")]
    OutOfRange(f64),

    #[error("Sum of scores ({sum}) exceeded the highest total score ({highest})")]
    InvalidScore { sum: u64, highest: u32 },

    #[error("Total weight is {0}, expected exactly 1")]
    InvalidWeight(f64),

    #[error("Jitter factor {0} is outside 1.0 - 2.0")]
    InvalidThreshold(f64),

    #[error("Maximum iterations reached ({0}) without hitting the target")]
    MaxIterationsExceeded(u64),

    #[error("Reference components do not match record: {0}")]
    ReferenceMismatch(String),
}

pub type Result<T> = std::result::Result<T, GradeError>;
