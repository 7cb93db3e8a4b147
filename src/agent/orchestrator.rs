use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::contract::CodeOutput;
use crate::error::PipelineError;

use super::adapters::{CodingAdapter, ModelAdapter, PlanningAdapter, ReviewAdapter};
use super::context::Session;
use super::outcome::{PlanReport, PlanWarning};
use super::types::StageKind;

/// Drives a [`Session`] through plan, generate and review.
///
/// Each trigger maps to one transition and awaits exactly one model call.
/// A failed call leaves the session's state block untouched.
pub struct Orchestrator {
    planner: Arc<dyn PlanningAdapter>,
    coder: Arc<dyn CodingAdapter>,
    reviewer: Arc<dyn ReviewAdapter>,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    /// Every stage runs against the same model endpoint.
    pub fn new(adapter: ModelAdapter) -> Result<Self, PipelineError> {
        Self::builder()
            .with_planning_adapter(adapter.clone())
            .with_coding_adapter(adapter.clone())
            .with_review_adapter(adapter)
            .build()
    }

    /// "Submit problem": `Idle | Planned | Coded | Reviewed -> Planned`.
    pub async fn submit_problem(
        &self,
        session: &mut Session,
        description: &str,
    ) -> Result<PlanReport, PipelineError> {
        let problem = description.trim();
        if problem.is_empty() {
            return Err(PipelineError::invalid_trigger(
                "problem description cannot be empty",
            ));
        }

        let mut plan = run_stage(session, StageKind::Planning, self.planner.plan(problem)).await?;

        if plan.problem != problem {
            debug!(model_problem = %plan.problem, "planner restated the problem; keeping the submitted text");
            plan.problem = problem.to_string();
        }

        info!(
            subtasks = plan.subtasks.len(),
            tech_stack = plan.tech_stack.len(),
            "plan ready"
        );
        session.record_plan(plan.clone());

        let report = PlanReport::new(plan);
        if let Some(warning) = report.warning {
            warn!("{warning}");
            session.record_warning(warning.to_string());
        }
        Ok(report)
    }

    /// "Generate code for selected subtask": `Planned -> Coded`.
    ///
    /// Allowed again from `Coded`/`Reviewed` to pick another subtask; the
    /// previous code and review are replaced.
    pub async fn generate_code(
        &self,
        session: &mut Session,
        subtask: &str,
    ) -> Result<CodeOutput, PipelineError> {
        let Some(plan) = session.plan() else {
            return Err(PipelineError::invalid_trigger(
                "no plan yet; submit a problem first",
            ));
        };

        if !plan.has_subtasks() {
            return Err(PipelineError::invalid_trigger(
                PlanWarning::NoSubtasks.to_string(),
            ));
        }

        let Some(selected) = plan.find_subtask(subtask) else {
            return Err(PipelineError::invalid_trigger(format!(
                "'{subtask}' is not a subtask of the current plan"
            )));
        };

        let selected = selected.to_string();
        let input = coder_input(&selected, &plan.tech_stack);

        let output = run_stage(session, StageKind::Coding, self.coder.code(&input)).await?;

        info!(filename = %output.filename, subtask = %selected, "code ready");
        session.record_code(selected, output.clone());
        Ok(output)
    }

    /// Convenience for the 1-based subtask numbers shown to users.
    pub async fn generate_code_at(
        &self,
        session: &mut Session,
        position: usize,
    ) -> Result<CodeOutput, PipelineError> {
        let subtask = match session.plan() {
            Some(plan) => plan.subtask_at(position).map(str::to_string).ok_or_else(|| {
                PipelineError::invalid_trigger(format!(
                    "subtask {position} does not exist; the plan has {}",
                    plan.subtasks.len()
                ))
            })?,
            None => {
                return Err(PipelineError::invalid_trigger(
                    "no plan yet; submit a problem first",
                ));
            }
        };

        self.generate_code(session, &subtask).await
    }

    /// "Review current code": `Coded -> Reviewed`.
    pub async fn review_code(&self, session: &mut Session) -> Result<String, PipelineError> {
        let Some(generated) = session.code() else {
            return Err(PipelineError::invalid_trigger(
                "no generated code to review",
            ));
        };

        let code = generated.output.code.clone();
        let review = run_stage(session, StageKind::Review, self.reviewer.review(&code)).await?;

        info!(length = review.len(), "review ready");
        session.record_review(review.clone());
        Ok(review)
    }
}

/// Wrap one stage call with start/end/failure bookkeeping.
async fn run_stage<T, F>(session: &mut Session, stage: StageKind, call: F) -> Result<T, PipelineError>
where
    F: Future<Output = Result<T, PipelineError>>,
{
    session.record_stage_start(stage);
    match call.await {
        Ok(value) => {
            session.record_stage_end(stage);
            Ok(value)
        }
        Err(error) => {
            warn!(%stage, kind = error.kind(), %error, "stage failed");
            session.record_stage_failure(stage, &error);
            Err(error)
        }
    }
}

/// Coder input: the selected subtask and the plan's stack as a list literal,
/// e.g. `Task: CRUD API\nTech stack: ['Go', 'React']`.
pub fn coder_input(subtask: &str, tech_stack: &[String]) -> String {
    format!("Task: {subtask}\nTech stack: {}", list_literal(tech_stack))
}

fn list_literal(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| quote(item)).collect();
    format!("[{}]", quoted.join(", "))
}

fn quote(item: &str) -> String {
    let delimiter = if item.contains('\'') && !item.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut quoted = String::with_capacity(item.len() + 2);
    quoted.push(delimiter);
    for ch in item.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c == delimiter => {
                quoted.push('\\');
                quoted.push(c);
            }
            c if !is_printable(c) => {
                let code = u32::from(c);
                let escape = match code {
                    0..=0xff => format!("\\x{code:02x}"),
                    0x100..=0xffff => format!("\\u{code:04x}"),
                    _ => format!("\\U{code:08x}"),
                };
                quoted.push_str(&escape);
            }
            c => quoted.push(c),
        }
    }
    quoted.push(delimiter);
    quoted
}

/// Characters a Python `repr` prints as-is: everything except control and
/// format characters, and separators other than the ASCII space.
fn is_printable(ch: char) -> bool {
    if ch == ' ' {
        return true;
    }
    if ch.is_control() || ch.is_whitespace() {
        return false;
    }
    !matches!(
        ch,
        '\u{ad}'
            | '\u{600}'..='\u{605}'
            | '\u{61c}'
            | '\u{6dd}'
            | '\u{70f}'
            | '\u{890}'..='\u{891}'
            | '\u{8e2}'
            | '\u{180e}'
            | '\u{200b}'..='\u{200f}'
            | '\u{202a}'..='\u{202e}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206f}'
            | '\u{feff}'
            | '\u{fff9}'..='\u{fffb}'
            | '\u{e000}'..='\u{f8ff}'
    )
}

pub struct OrchestratorBuilder {
    planner: Option<Arc<dyn PlanningAdapter>>,
    coder: Option<Arc<dyn CodingAdapter>>,
    reviewer: Option<Arc<dyn ReviewAdapter>>,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            planner: None,
            coder: None,
            reviewer: None,
        }
    }

    pub fn with_planning_adapter<P>(mut self, adapter: P) -> Self
    where
        P: PlanningAdapter + 'static,
    {
        self.planner = Some(Arc::new(adapter));
        self
    }

    pub fn with_coding_adapter<C>(mut self, adapter: C) -> Self
    where
        C: CodingAdapter + 'static,
    {
        self.coder = Some(Arc::new(adapter));
        self
    }

    pub fn with_review_adapter<R>(mut self, adapter: R) -> Self
    where
        R: ReviewAdapter + 'static,
    {
        self.reviewer = Some(Arc::new(adapter));
        self
    }

    pub fn build(self) -> Result<Orchestrator, PipelineError> {
        let missing = |stage: StageKind| {
            PipelineError::Configuration(format!("no adapter configured for the {stage} stage"))
        };

        Ok(Orchestrator {
            planner: self.planner.ok_or_else(|| missing(StageKind::Planning))?,
            coder: self.coder.ok_or_else(|| missing(StageKind::Coding))?,
            reviewer: self.reviewer.ok_or_else(|| missing(StageKind::Review))?,
        })
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
