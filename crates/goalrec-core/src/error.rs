//! Error taxonomy for the goal recognition engine.

use std::path::PathBuf;

/// Errors produced while computing goal probabilities.
#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    /// The external planner process could not be started. Fatal: there is
    /// no cost data to fall back on, so the run is aborted.
    #[error("failed to spawn planner `{command}`: {source}")]
    PlannerSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The planner produced no parseable cost for a problem that the
    /// computation cannot proceed without. Carried explicitly so an
    /// unknown cost can never masquerade as a valid one downstream.
    #[error("planner reported no cost for problem: {problem}")]
    UnknownCost { problem: PathBuf },

    /// L1 normalization over a score vector whose sum is zero, negative,
    /// or non-finite is undefined.
    #[error("degenerate score distribution: sum = {sum}")]
    DegenerateDistribution { sum: f64 },

    /// The per-branch observation list and the goal list must be
    /// index-aligned and equal in length.
    #[error("goal/observation mismatch: {goals} goals vs {positions} current positions")]
    BranchMismatch { goals: usize, positions: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for goal recognition operations.
pub type Result<T> = std::result::Result<T, RecognitionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_cost_display_names_problem() {
        let err = RecognitionError::UnknownCost {
            problem: PathBuf::from("/fixtures/goal1.pddl"),
        };
        assert!(err.to_string().contains("goal1.pddl"));
    }

    #[test]
    fn test_degenerate_distribution_display() {
        let err = RecognitionError::DegenerateDistribution { sum: 0.0 };
        assert!(err.to_string().contains("degenerate"));
    }

    #[test]
    fn test_branch_mismatch_display() {
        let err = RecognitionError::BranchMismatch {
            goals: 2,
            positions: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains('2'));
        assert!(msg.contains('3'));
    }
}
