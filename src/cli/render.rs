use colored::*;

use crate::agent::{GeneratedCode, PlanReport, Session, SessionEvent, SessionPhase, StageAgent};
use crate::config::Config;
use crate::contract::{CodeOutput, CodingPlan};
use crate::error::PipelineError;

pub(crate) fn render_plan(report: &PlanReport) {
    let plan = &report.plan;
    println!();
    println!("{} {}", "📋 Plan for:".bold().cyan(), plan.problem.bold());

    if plan.has_subtasks() {
        println!("\n{}", "Subtasks:".bold());
        for (idx, subtask) in plan.subtasks.iter().enumerate() {
            println!("  [{}] {}", (idx + 1).to_string().cyan(), subtask);
        }
    }

    println!("\n{} {}", "Tech stack:".bold(), tech_stack_line(plan));

    if let Some(warning) = report.warning {
        println!("\n{} {}", "⚠️".yellow(), warning.to_string().yellow());
    }

    if report.can_select_subtask() {
        println!(
            "\n{}",
            "Pick a subtask by number to generate code for it.".dimmed()
        );
    }
}

pub(crate) fn render_code(output: &CodeOutput) {
    println!();
    println!(
        "{} {} {}",
        "💻 Generated".bold().green(),
        output.filename.bold(),
        format!("({})", output.language()).dimmed()
    );
    println!("{}", "─".repeat(60).dimmed());
    println!("{}", output.code);
    println!("{}", "─".repeat(60).dimmed());

    if !output.explanation.trim().is_empty() {
        println!("{} {}", "Explanation:".bold(), output.explanation.trim());
    }
}

pub(crate) fn render_review(review: &str) {
    println!();
    println!("{}", "🔍 Code Review".bold().magenta());
    println!("{review}");
}

pub(crate) fn render_error(error: &PipelineError) {
    eprintln!("{} {}", format!("❌ [{}]", error.kind()).red().bold(), error);

    let hint = match error {
        PipelineError::Configuration(_) => Some("Run `planwright config --help` to update settings."),
        PipelineError::Transport { .. } => {
            Some("Check your API key and connectivity, then retry. Session state was left unchanged.")
        }
        PipelineError::SchemaViolation { .. } => {
            Some("The model replied in an unexpected shape. Retrying usually helps.")
        }
        PipelineError::InvalidTrigger(_) => None,
    };

    if let Some(hint) = hint {
        eprintln!("   {}", hint.dimmed());
    }
}

pub(crate) fn render_session(session: &Session) {
    let state = session.state();
    println!("{} {}", "Phase:".bold(), phase_label(state.phase()));

    match state.plan() {
        Some(plan) => {
            println!("{} {}", "Problem:".bold(), plan.problem);
            for (idx, subtask) in plan.subtasks.iter().enumerate() {
                let marker = match state.code() {
                    Some(GeneratedCode { subtask: current, .. }) if current == subtask => "*",
                    _ => " ",
                };
                println!("  {marker}[{}] {}", (idx + 1).to_string().cyan(), subtask);
            }
            println!("{} {}", "Tech stack:".bold(), tech_stack_line(plan));
        }
        None => println!("No plan yet. Use `plan <problem>` to start."),
    }

    if let Some(generated) = state.code() {
        println!(
            "{} {} for '{}'",
            "Code:".bold(),
            generated.output.filename,
            generated.subtask
        );
    }

    if state.review().is_some() {
        println!("{} available (use `review` to regenerate)", "Review:".bold());
    }
}

pub(crate) fn render_history(session: &Session) {
    if session.events().is_empty() {
        println!("Nothing has happened in this session yet.");
        return;
    }

    for (idx, event) in session.events().iter().enumerate() {
        println!("  {:>3}. {}", idx + 1, describe_event(event));
    }
}

fn describe_event(event: &SessionEvent) -> String {
    match event {
        SessionEvent::StageStarted(stage) => {
            format!("{} started", StageAgent::for_stage(*stage).name)
        }
        SessionEvent::StageCompleted(stage) => {
            format!("{} finished", StageAgent::for_stage(*stage).name)
        }
        SessionEvent::StageFailed { stage, error } => format!(
            "{} failed [{}]: {}",
            StageAgent::for_stage(*stage).name,
            error.kind(),
            error
        )
        .red()
        .to_string(),
        SessionEvent::DownstreamCleared => "previous code and review discarded".to_string(),
        SessionEvent::PlanReady { subtasks } => format!("plan stored with {subtasks} subtask(s)"),
        SessionEvent::CodeReady { filename } => format!("code stored as {filename}"),
        SessionEvent::ReviewReady { length } => format!("review stored ({length} chars)"),
        SessionEvent::Warning(message) => format!("warning: {message}").yellow().to_string(),
    }
}

pub(crate) fn render_model_line(config: &Config) {
    println!(
        "{}",
        format!(
            "Provider: {} · Model: {}",
            config.llm.provider.display_name(),
            config.models.model
        )
        .dimmed()
    );
}

fn tech_stack_line(plan: &CodingPlan) -> String {
    if plan.tech_stack.is_empty() {
        "(none suggested)".to_string()
    } else {
        plan.tech_stack.join(", ")
    }
}

fn phase_label(phase: SessionPhase) -> ColoredString {
    match phase {
        SessionPhase::Idle => phase.to_string().dimmed(),
        SessionPhase::Planned => phase.to_string().cyan(),
        SessionPhase::Coded => phase.to_string().green(),
        SessionPhase::Reviewed => phase.to_string().magenta(),
    }
}
