use crate::contract::OutputContract;

use super::prompt::{CODER_INSTRUCTIONS, PLANNER_INSTRUCTIONS, REVIEWER_INSTRUCTIONS};
use super::types::StageKind;

/// Fixed configuration for one stage: an instruction template plus the
/// output contract the model must satisfy, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageAgent {
    pub kind: StageKind,
    pub name: &'static str,
    pub instructions: &'static str,
    pub contract: Option<OutputContract>,
}

pub const PLANNER: StageAgent = StageAgent {
    kind: StageKind::Planning,
    name: "Planner Agent",
    instructions: PLANNER_INSTRUCTIONS,
    contract: Some(OutputContract::CodingPlan),
};

pub const CODER: StageAgent = StageAgent {
    kind: StageKind::Coding,
    name: "Code Generator",
    instructions: CODER_INSTRUCTIONS,
    contract: Some(OutputContract::CodeOutput),
};

pub const REVIEWER: StageAgent = StageAgent {
    kind: StageKind::Review,
    name: "Code Reviewer",
    instructions: REVIEWER_INSTRUCTIONS,
    contract: None,
};

impl StageAgent {
    pub fn for_stage(kind: StageKind) -> &'static StageAgent {
        match kind {
            StageKind::Planning => &PLANNER,
            StageKind::Coding => &CODER,
            StageKind::Review => &REVIEWER,
        }
    }
}
