use std::fmt;

use crate::contract::CodingPlan;

/// Non-fatal conditions reported alongside a successful plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanWarning {
    /// The plan cannot progress past `Planned`; no subtask can be selected.
    NoSubtasks,
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanWarning::NoSubtasks => write!(f, "No subtasks were returned by the planner agent."),
        }
    }
}

/// Result of a successful "submit problem" trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanReport {
    pub plan: CodingPlan,
    pub warning: Option<PlanWarning>,
}

impl PlanReport {
    pub fn new(plan: CodingPlan) -> Self {
        let warning = (!plan.has_subtasks()).then_some(PlanWarning::NoSubtasks);
        Self { plan, warning }
    }

    /// Whether a subtask selector should be offered.
    pub fn can_select_subtask(&self) -> bool {
        self.warning.is_none()
    }
}
