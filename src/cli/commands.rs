use anyhow::{Context, Result, bail};

use crate::agent::{ModelAdapter, Orchestrator, Session};
use crate::config::Config;

use super::args::{Cli, Command, PlanArgs, RunArgs};
use super::config_cmd;
use super::interactive;
use super::render;
use super::util;

pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => show_welcome_message(),
        Some(Command::Config(args)) => config_cmd::handle_config(&args),
        Some(Command::Plan(args)) => {
            let (config, orchestrator) = pipeline()?;
            handle_plan(args, &config, &orchestrator).await
        }
        Some(Command::Run(args)) => {
            let (config, orchestrator) = pipeline()?;
            handle_run(args, &config, &orchestrator).await
        }
        Some(Command::Session) => {
            let (config, orchestrator) = pipeline()?;
            render::render_model_line(&config);
            interactive::run_session(&orchestrator).await
        }
    }
}

/// Load validated configuration and wire every stage to it. Missing
/// credentials fail here, before any model call.
fn pipeline() -> Result<(Config, Orchestrator)> {
    let config = Config::load()?;
    let adapter = ModelAdapter::from_config(&config)?;
    let orchestrator = Orchestrator::new(adapter)?;
    Ok((config, orchestrator))
}

async fn handle_plan(args: PlanArgs, config: &Config, orchestrator: &Orchestrator) -> Result<()> {
    let problem = require_problem(&args.problem, "plan")?;
    render::render_model_line(config);

    let mut session = Session::new();
    let report = orchestrator
        .submit_problem(&mut session, &problem)
        .await
        .inspect_err(render::render_error)
        .context("Planning failed")?;

    render::render_plan(&report);
    Ok(())
}

async fn handle_run(args: RunArgs, config: &Config, orchestrator: &Orchestrator) -> Result<()> {
    let problem = require_problem(&args.problem, "run")?;
    render::render_model_line(config);

    let mut session = Session::new();
    let report = orchestrator
        .submit_problem(&mut session, &problem)
        .await
        .inspect_err(render::render_error)
        .context("Planning failed")?;
    render::render_plan(&report);

    let Some(position) = args.subtask else {
        return Ok(());
    };

    let output = orchestrator
        .generate_code_at(&mut session, position)
        .await
        .inspect_err(render::render_error)
        .context("Code generation failed")?;
    render::render_code(&output);

    if args.review {
        let review = orchestrator
            .review_code(&mut session)
            .await
            .inspect_err(render::render_error)
            .context("Review failed")?;
        render::render_review(&review);
    }

    Ok(())
}

fn require_problem(words: &[String], command: &str) -> Result<String> {
    match util::problem_text(words)? {
        Some(problem) if !problem.is_empty() => Ok(problem),
        _ => bail!(
            "Problem description cannot be empty. Usage: planwright {command} \"your problem\""
        ),
    }
}

fn show_welcome_message() -> Result<()> {
    let config_path = Config::config_path()?;

    println!("🧭 planwright: plan, generate and review code with an LLM");
    println!();
    println!("📖 How it works:");
    println!("   1. A planner breaks your problem into subtasks and a tech stack");
    println!("   2. A coder writes one file for the subtask you pick");
    println!("   3. A reviewer critiques the generated code");
    println!();

    if !config_path.exists() {
        println!("⚠️  No config file at {}.", config_path.display());
        println!("   Set GEMINI_API_KEY or run: planwright config --api-key <KEY>");
        println!();
    }

    println!("🚀 Try:");
    println!("   planwright plan \"Build a todo app\"");
    println!("   planwright run \"Build a todo app\" --subtask 1 --review");
    println!("   planwright session");
    println!();
    println!("Run `planwright --help` for all options.");

    Ok(())
}
