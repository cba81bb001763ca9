//! Probability model: logistic scoring of cost deltas and L1 normalization.
//!
//! Pure functions, no I/O. Costs come in as integers from the oracle; the
//! output is a probability distribution over candidate goals.

use serde::{Deserialize, Serialize};

use crate::error::{RecognitionError, Result};

/// Tunable parameters of the probability model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Positive constant scaling the cost delta inside the logistic
    /// exponent. Larger values make the distribution commit faster as
    /// the agent's remaining cost diverges between goals.
    pub sensitivity: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self { sensitivity: 1.0 }
    }
}

/// Pre-normalization likelihood that the agent is pursuing a goal.
///
/// Let delta = `cost_from_agent - cost_from_start`: how much the agent's
/// remaining cost to this goal has grown or shrunk relative to the cost of
/// reaching it from the trajectory start. The score is the logistic of
/// `-sensitivity * delta`: 0.5 at delta = 0, approaching 1 as the agent
/// closes in on the goal and 0 as it moves away.
pub fn score(cost_from_agent: u32, cost_from_start: u32, sensitivity: f64) -> f64 {
    let delta = f64::from(cost_from_agent) - f64::from(cost_from_start);
    let numerator = (-sensitivity * delta).exp();
    numerator / (1.0 + numerator)
}

/// L1-normalize a score vector into a probability distribution.
///
/// Defined only for a strictly positive, finite sum; anything else is a
/// degenerate distribution and reported as such rather than producing
/// NaN or Inf values.
pub fn normalize(scores: &[f64]) -> Result<Vec<f64>> {
    let sum: f64 = scores.iter().sum();
    if !(sum.is_finite() && sum > 0.0) {
        return Err(RecognitionError::DegenerateDistribution { sum });
    }
    Ok(scores.iter().map(|s| s / sum).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn test_score_half_at_equal_costs() {
        for c in [0u32, 1, 10, 1000] {
            assert!((score(c, c, 1.0) - 0.5).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_score_decreasing_in_agent_cost() {
        let mut prev = f64::INFINITY;
        for agent_cost in 0..20 {
            let s = score(agent_cost, 10, 1.0);
            assert!(s < prev, "score must strictly decrease as agent cost grows");
            prev = s;
        }
    }

    #[test]
    fn test_score_increasing_in_start_cost() {
        let mut prev = f64::NEG_INFINITY;
        for start_cost in 0..20 {
            let s = score(10, start_cost, 1.0);
            assert!(s > prev, "score must strictly increase with start cost");
            prev = s;
        }
    }

    #[test]
    fn test_score_bounded_open_unit_interval() {
        for (a, s) in [(0u32, 100u32), (100, 0), (3, 3)] {
            let v = score(a, s, 1.0);
            assert!(v > 0.0 && v < 1.0);
        }
    }

    #[test]
    fn test_score_closer_goal_scores_higher() {
        // Goal A: agent cost 2 of start cost 10. Goal B: agent cost 8 of 10.
        assert!(score(2, 10, 1.0) > score(8, 10, 1.0));
    }

    #[test]
    fn test_sensitivity_sharpens_score() {
        // Same delta, higher sensitivity pushes the score further from 0.5.
        let mild = score(2, 10, 0.5);
        let sharp = score(2, 10, 2.0);
        assert!(sharp > mild);
    }

    #[test]
    fn test_normalize_sums_to_one() {
        let probs = normalize(&[0.2, 0.5, 0.8]).unwrap();
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_normalize_preserves_ordering() {
        let scores = [0.1, 0.9, 0.4];
        let probs = normalize(&scores).unwrap();
        assert!(probs[1] > probs[2]);
        assert!(probs[2] > probs[0]);
    }

    #[test]
    fn test_normalize_equal_scores_uniform() {
        let probs = normalize(&[0.5, 0.5]).unwrap();
        assert!((probs[0] - 0.5).abs() < TOLERANCE);
        assert!((probs[1] - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn test_normalize_zero_sum_is_degenerate() {
        let err = normalize(&[0.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            RecognitionError::DegenerateDistribution { .. }
        ));
    }

    #[test]
    fn test_normalize_empty_is_degenerate() {
        assert!(normalize(&[]).is_err());
    }

    #[test]
    fn test_normalize_nan_sum_is_degenerate() {
        assert!(normalize(&[f64::NAN, 0.5]).is_err());
    }
}
