pub mod adapters;
pub mod context;
pub mod orchestrator;
pub mod outcome;
mod prompt;
pub mod stages;
pub mod types;

#[allow(unused_imports)]
pub use adapters::{AgentOutput, CodingAdapter, ModelAdapter, PlanningAdapter, ReviewAdapter};
#[allow(unused_imports)]
pub use context::{GeneratedCode, Session, SessionEvent, SessionState};
#[allow(unused_imports)]
pub use orchestrator::{Orchestrator, OrchestratorBuilder, coder_input};
#[allow(unused_imports)]
pub use outcome::{PlanReport, PlanWarning};
#[allow(unused_imports)]
pub use stages::{CODER, PLANNER, REVIEWER, StageAgent};
#[allow(unused_imports)]
pub use types::{SessionPhase, StageKind};
