//! Scenario evaluation: walk observed trajectories through the recognition
//! session and report how the goal distribution evolves.
//!
//! A test root holds two condition subdirectories (`no-reduction`,
//! `with-reduction`), each with the candidate goal files `goal1.pddl` /
//! `goal2.pddl` and one observation directory per goal path (`g1-path`,
//! `g2-path`). Observation files are named `<branch>-<step>.pddl`, where
//! the branch indexes the candidate goal and steps count from 0.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::model::ModelConfig;
use crate::oracle::CostOracle;
use crate::session::RecognitionSession;

/// Whether the goal/plan space was pruned before recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    NoReduction,
    WithReduction,
}

impl Condition {
    /// Subdirectory name under the test root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Condition::NoReduction => "no-reduction",
            Condition::WithReduction => "with-reduction",
        }
    }
}

/// Which candidate goal the observed trajectory actually heads toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalPath {
    Goal1,
    Goal2,
}

impl GoalPath {
    /// Observation subdirectory for this trajectory.
    pub fn dir_name(&self) -> &'static str {
        match self {
            GoalPath::Goal1 => "g1-path",
            GoalPath::Goal2 => "g2-path",
        }
    }

    /// Index of the pursued goal in the candidate list.
    pub fn goal_index(&self) -> usize {
        match self {
            GoalPath::Goal1 => 0,
            GoalPath::Goal2 => 1,
        }
    }
}

/// The four (goal-path × condition) combinations evaluated per test.
/// One table, one loop: the historical implementation duplicated this
/// block four times per test and drifted between copies.
pub const COMBINATIONS: [(GoalPath, Condition); 4] = [
    (GoalPath::Goal1, Condition::NoReduction),
    (GoalPath::Goal1, Condition::WithReduction),
    (GoalPath::Goal2, Condition::NoReduction),
    (GoalPath::Goal2, Condition::WithReduction),
];

/// Number of candidate goals per test fixture.
const GOAL_COUNT: usize = 2;

/// Distribution at one trajectory step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDistribution {
    pub step: u32,
    pub probabilities: Vec<f64>,
}

/// Distributions for every step of one (goal-path × condition) combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinationReport {
    pub goal_path: GoalPath,
    pub condition: Condition,

    /// Optimal cost of the pursued path; steps run 0..=trajectory_len.
    pub trajectory_len: u32,
    pub steps: Vec<StepDistribution>,
}

/// All four combination reports for one test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestReport {
    pub test_id: u32,
    pub combinations: Vec<CombinationReport>,
}

/// Drives recognition sessions across entire test trajectories.
pub struct ScenarioEvaluator {
    oracle: Arc<dyn CostOracle>,
    session: RecognitionSession,
}

impl ScenarioEvaluator {
    pub fn new(oracle: Arc<dyn CostOracle>, model: ModelConfig) -> Self {
        let session = RecognitionSession::new(oracle.clone(), model);
        Self { oracle, session }
    }

    /// Evaluate all four combinations for one test root.
    pub async fn run(&self, domain: &Path, test_root: &Path, test_id: u32) -> Result<TestReport> {
        info!(test_id, test_root = %test_root.display(), "Starting test");

        let mut combinations = Vec::with_capacity(COMBINATIONS.len());
        for (goal_path, condition) in COMBINATIONS {
            let report = self
                .run_combination(domain, test_root, goal_path, condition)
                .await?;
            combinations.push(report);
        }

        Ok(TestReport {
            test_id,
            combinations,
        })
    }

    /// Evaluate the battery of tests `Test1..TestN` under a common root.
    pub async fn run_battery(
        &self,
        domain: &Path,
        tests_root: &Path,
        count: u32,
    ) -> Result<Vec<TestReport>> {
        let mut reports = Vec::with_capacity(count as usize);
        for test_id in 1..=count {
            let test_root = tests_root.join(format!("Test{test_id}"));
            reports.push(self.run(domain, &test_root, test_id).await?);
        }
        Ok(reports)
    }

    async fn run_combination(
        &self,
        domain: &Path,
        test_root: &Path,
        goal_path: GoalPath,
        condition: Condition,
    ) -> Result<CombinationReport> {
        let cond_dir = test_root.join(condition.dir_name());
        let goals: Vec<PathBuf> = (1..=GOAL_COUNT)
            .map(|g| cond_dir.join(format!("goal{g}.pddl")))
            .collect();

        // The optimal cost of the path actually taken bounds the trajectory.
        let pursued = &goals[goal_path.goal_index()];
        let trajectory_len = self
            .oracle
            .cost(domain, pursued)
            .await?
            .known_or(pursued)?;

        info!(
            goal_path = goal_path.dir_name(),
            condition = condition.dir_name(),
            trajectory_len,
            "Evaluating combination"
        );

        let mut steps = Vec::with_capacity(trajectory_len as usize + 1);
        for step in 0..=trajectory_len {
            let positions: Vec<PathBuf> = (1..=GOAL_COUNT)
                .map(|branch| observation_file(&cond_dir, goal_path, branch, step))
                .collect();

            let probabilities = self.session.distribution(domain, &positions, &goals).await?;
            info!(
                goal_path = goal_path.dir_name(),
                condition = condition.dir_name(),
                step,
                probabilities = ?probabilities,
                "Step distribution"
            );
            steps.push(StepDistribution {
                step,
                probabilities,
            });
        }

        Ok(CombinationReport {
            goal_path,
            condition,
            trajectory_len,
            steps,
        })
    }
}

/// Path of the observation problem for one branch at one trajectory step.
fn observation_file(cond_dir: &Path, goal_path: GoalPath, branch: usize, step: u32) -> PathBuf {
    cond_dir
        .join(goal_path.dir_name())
        .join(format!("{branch}-{step}.pddl"))
}
