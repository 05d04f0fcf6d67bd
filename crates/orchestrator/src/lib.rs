//! The four pipeline handlers (spec §4.5): Planner, Dialogue Runner,
//! Judge, and Curator. Each is a plain struct over its repositories,
//! gateway, queue, and object store -- the `worker` binary owns the
//! consumer loops and timers that invoke them.

pub mod bootstrap;
pub mod curator;
pub mod error;
pub mod judge;
pub mod messages;
pub mod planner;
pub mod runner;

pub use bootstrap::load_pipeline_config;
pub use curator::{Curator, CuratorOutcome};
pub use error::OrchestratorError;
pub use judge::{JudgeHandler, JudgeOutcome};
pub use messages::{DialogueJob, JudgeJob, RunJudgedEvent};
pub use planner::{PlanOutcome, Planner};
pub use runner::{DialogueRunner, RunnerOutcome};
