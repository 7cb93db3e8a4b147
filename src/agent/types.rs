use std::fmt;

/// The three stages of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Planning,
    Coding,
    Review,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StageKind::Planning => "planning",
            StageKind::Coding => "coding",
            StageKind::Review => "review",
        };
        write!(f, "{label}")
    }
}

/// Where a session stands, derived from the artifacts it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    Idle,
    Planned,
    Coded,
    Reviewed,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Planned => "planned",
            SessionPhase::Coded => "coded",
            SessionPhase::Reviewed => "reviewed",
        };
        write!(f, "{label}")
    }
}
