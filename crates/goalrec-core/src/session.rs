//! Recognition session: one probability distribution for one observation
//! instant.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::error::{RecognitionError, Result};
use crate::model::{normalize, score, ModelConfig};
use crate::oracle::CostOracle;

/// Combines the cost oracle and the probability model.
///
/// Calling convention: `current_positions` and `goals` are index-aligned
/// and equal-length — one current-position observation per candidate goal,
/// since each goal branch's trajectory is tracked separately. A current
/// position is itself a planning problem whose goal is "reach the observed
/// state", so one oracle serves both distance-from-start and
/// distance-from-here.
pub struct RecognitionSession {
    oracle: Arc<dyn CostOracle>,
    model: ModelConfig,
}

impl RecognitionSession {
    pub fn new(oracle: Arc<dyn CostOracle>, model: ModelConfig) -> Self {
        Self { oracle, model }
    }

    /// Probability distribution over `goals` given the agent's current
    /// per-branch positions.
    ///
    /// An `Unknown` cost for either leg of any goal aborts the whole
    /// distribution for this instant: partial results would silently skew
    /// the normalization.
    pub async fn distribution(
        &self,
        domain: &Path,
        current_positions: &[impl AsRef<Path> + Sync],
        goals: &[impl AsRef<Path> + Sync],
    ) -> Result<Vec<f64>> {
        if current_positions.len() != goals.len() {
            return Err(RecognitionError::BranchMismatch {
                goals: goals.len(),
                positions: current_positions.len(),
            });
        }

        let mut scores = Vec::with_capacity(goals.len());
        for (goal, position) in goals.iter().zip(current_positions) {
            let goal = goal.as_ref();
            let position = position.as_ref();

            let cost_from_start = self.oracle.cost(domain, goal).await?.known_or(goal)?;
            let cost_from_agent = self
                .oracle
                .cost(domain, position)
                .await?
                .known_or(position)?;

            let s = score(cost_from_agent, cost_from_start, self.model.sensitivity);
            debug!(
                goal = %goal.display(),
                cost_from_start,
                cost_from_agent,
                score = s,
                "Scored candidate goal"
            );
            scores.push(s);
        }

        normalize(&scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::PlanCost;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::PathBuf;

    /// Deterministic oracle mapping problem file names to costs.
    struct TableOracle {
        costs: HashMap<String, PlanCost>,
    }

    impl TableOracle {
        fn new(entries: &[(&str, PlanCost)]) -> Arc<Self> {
            Arc::new(Self {
                costs: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), *v))
                    .collect(),
            })
        }
    }

    #[async_trait]
    impl CostOracle for TableOracle {
        async fn cost(&self, _domain: &Path, problem: &Path) -> Result<PlanCost> {
            let key = problem.file_name().unwrap().to_string_lossy().to_string();
            Ok(*self.costs.get(&key).unwrap_or(&PlanCost::Unknown))
        }
    }

    fn session(oracle: Arc<dyn CostOracle>) -> RecognitionSession {
        RecognitionSession::new(oracle, ModelConfig::default())
    }

    #[tokio::test]
    async fn test_symmetric_costs_give_uniform_distribution() {
        let oracle = TableOracle::new(&[
            ("goal1.pddl", PlanCost::Known(10)),
            ("goal2.pddl", PlanCost::Known(10)),
            ("pos1.pddl", PlanCost::Known(5)),
            ("pos2.pddl", PlanCost::Known(5)),
        ]);
        let probs = session(oracle)
            .distribution(
                Path::new("domain.pddl"),
                &[PathBuf::from("pos1.pddl"), PathBuf::from("pos2.pddl")],
                &[PathBuf::from("goal1.pddl"), PathBuf::from("goal2.pddl")],
            )
            .await
            .unwrap();
        assert_eq!(probs.len(), 2);
        assert!((probs[0] - 0.5).abs() < 1e-9);
        assert!((probs[1] - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_closer_goal_gets_higher_probability() {
        // Agent is 2 steps from goal 1 but 8 from goal 2, both 10 from start.
        let oracle = TableOracle::new(&[
            ("goal1.pddl", PlanCost::Known(10)),
            ("goal2.pddl", PlanCost::Known(10)),
            ("pos1.pddl", PlanCost::Known(2)),
            ("pos2.pddl", PlanCost::Known(8)),
        ]);
        let probs = session(oracle)
            .distribution(
                Path::new("domain.pddl"),
                &[PathBuf::from("pos1.pddl"), PathBuf::from("pos2.pddl")],
                &[PathBuf::from("goal1.pddl"), PathBuf::from("goal2.pddl")],
            )
            .await
            .unwrap();
        assert!(probs[0] > probs[1]);
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_unknown_cost_aborts_distribution() {
        let oracle = TableOracle::new(&[
            ("goal1.pddl", PlanCost::Known(10)),
            ("goal2.pddl", PlanCost::Unknown),
            ("pos1.pddl", PlanCost::Known(2)),
            ("pos2.pddl", PlanCost::Known(8)),
        ]);
        let err = session(oracle)
            .distribution(
                Path::new("domain.pddl"),
                &[PathBuf::from("pos1.pddl"), PathBuf::from("pos2.pddl")],
                &[PathBuf::from("goal1.pddl"), PathBuf::from("goal2.pddl")],
            )
            .await
            .unwrap_err();
        match err {
            RecognitionError::UnknownCost { problem } => {
                assert_eq!(problem, PathBuf::from("goal2.pddl"));
            }
            other => panic!("expected UnknownCost, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_branch_mismatch_rejected() {
        let oracle = TableOracle::new(&[]);
        let err = session(oracle)
            .distribution(
                Path::new("domain.pddl"),
                &[PathBuf::from("pos1.pddl")],
                &[PathBuf::from("goal1.pddl"), PathBuf::from("goal2.pddl")],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RecognitionError::BranchMismatch { .. }));
    }
}
