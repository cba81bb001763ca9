//! goalrec Core Library
//!
//! Cost-based goal recognition: an external classical planner supplies
//! optimal plan costs, a logistic model turns cost deltas into per-goal
//! scores, and a scenario evaluator walks observed trajectories to report
//! how the goal distribution evolves step by step.

pub mod error;
pub mod model;
pub mod oracle;
pub mod scenario;
pub mod session;
pub mod telemetry;

pub use error::{RecognitionError, Result};

pub use model::{normalize, score, ModelConfig};

pub use oracle::{parse_plan_cost, CostOracle, PlanCost, PlannerConfig, SubprocessOracle};

pub use scenario::{
    CombinationReport, Condition, GoalPath, ScenarioEvaluator, StepDistribution, TestReport,
    COMBINATIONS,
};

pub use session::RecognitionSession;

pub use telemetry::init_tracing;
