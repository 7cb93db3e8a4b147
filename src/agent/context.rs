use crate::contract::{CodeOutput, CodingPlan};
use crate::error::PipelineError;

use super::types::{SessionPhase, StageKind};

/// The artifacts one session holds: at most one of each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    plan: Option<CodingPlan>,
    code: Option<GeneratedCode>,
    review: Option<String>,
}

/// Code output together with the subtask it was generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    pub subtask: String,
    pub output: CodeOutput,
}

impl SessionState {
    pub fn plan(&self) -> Option<&CodingPlan> {
        self.plan.as_ref()
    }

    pub fn code(&self) -> Option<&GeneratedCode> {
        self.code.as_ref()
    }

    pub fn review(&self) -> Option<&str> {
        self.review.as_deref()
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.plan, &self.code, &self.review) {
            (None, _, _) => SessionPhase::Idle,
            (Some(_), None, _) => SessionPhase::Planned,
            (Some(_), Some(_), None) => SessionPhase::Coded,
            (Some(_), Some(_), Some(_)) => SessionPhase::Reviewed,
        }
    }
}

/// One interactive session: its state block plus an audit trail.
///
/// Transitions take `&mut Session`, so only one stage can be in flight per
/// session. Separate sessions share nothing.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SessionState,
    events: Vec<SessionEvent>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    pub fn plan(&self) -> Option<&CodingPlan> {
        self.state.plan()
    }

    pub fn code(&self) -> Option<&GeneratedCode> {
        self.state.code()
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    pub(super) fn record_event(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    pub(super) fn record_stage_start(&mut self, stage: StageKind) {
        self.record_event(SessionEvent::StageStarted(stage));
    }

    pub(super) fn record_stage_end(&mut self, stage: StageKind) {
        self.record_event(SessionEvent::StageCompleted(stage));
    }

    pub(super) fn record_stage_failure(&mut self, stage: StageKind, error: &PipelineError) {
        self.record_event(SessionEvent::StageFailed {
            stage,
            error: error.clone(),
        });
    }

    pub(super) fn record_warning(&mut self, message: impl Into<String>) {
        self.record_event(SessionEvent::Warning(message.into()));
    }

    /// Store a fresh plan. Downstream artifacts belong to the old plan and
    /// are discarded.
    pub(super) fn record_plan(&mut self, plan: CodingPlan) {
        let subtasks = plan.subtasks.len();
        let discarded = self.state.code.is_some() || self.state.review.is_some();
        self.state = SessionState {
            plan: Some(plan),
            code: None,
            review: None,
        };
        if discarded {
            self.record_event(SessionEvent::DownstreamCleared);
        }
        self.record_event(SessionEvent::PlanReady { subtasks });
    }

    /// Store generated code. A review of earlier code no longer applies.
    pub(super) fn record_code(&mut self, subtask: String, output: CodeOutput) {
        let filename = output.filename.clone();
        self.state.code = Some(GeneratedCode { subtask, output });
        self.state.review = None;
        self.record_event(SessionEvent::CodeReady { filename });
    }

    pub(super) fn record_review(&mut self, review: String) {
        let length = review.chars().count();
        self.state.review = Some(review);
        self.record_event(SessionEvent::ReviewReady { length });
    }
}

/// Audit events emitted as triggers are processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    StageStarted(StageKind),
    StageCompleted(StageKind),
    StageFailed { stage: StageKind, error: PipelineError },
    DownstreamCleared,
    PlanReady { subtasks: usize },
    CodeReady { filename: String },
    ReviewReady { length: usize },
    Warning(String),
}
