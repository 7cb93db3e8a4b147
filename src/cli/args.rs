use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use super::commands;

/// Entry point for the `planwright` command-line interface.
#[derive(Debug, Parser)]
#[command(
    name = "planwright",
    about = "Plan, generate and review code with an LLM",
    version,
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose logging of LLM requests and responses
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Break a problem into subtasks and a suggested tech stack.
    Plan(PlanArgs),
    /// Plan, then optionally generate code for one subtask and review it.
    Run(RunArgs),
    /// Interactive session: plan, pick a subtask, generate, review.
    Session,
    /// Show or update the saved configuration.
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Problem description (read from stdin when omitted).
    pub problem: Vec<String>,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Problem description (read from stdin when omitted).
    pub problem: Vec<String>,

    /// Generate code for this subtask (1-based, as listed in the plan).
    #[arg(short = 's', long)]
    pub subtask: Option<usize>,

    /// Review the generated code.
    #[arg(short = 'r', long, requires = "subtask")]
    pub review: bool,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Provider preset: gemini, openrouter or openai
    #[arg(long)]
    pub provider: Option<String>,

    /// Set the API key
    #[arg(long)]
    pub api_key: Option<String>,

    /// Set the model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// Override the chat-completions base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Set timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Set the context window used for completion budgets
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Set the sampling temperature
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Request JSON-schema structured output for planner and coder
    #[arg(long)]
    pub structured_output: Option<bool>,
}

impl ConfigArgs {
    pub fn has_updates(&self) -> bool {
        self.provider.is_some()
            || self.api_key.is_some()
            || self.model.is_some()
            || self.base_url.is_some()
            || self.timeout.is_some()
            || self.max_tokens.is_some()
            || self.temperature.is_some()
            || self.structured_output.is_some()
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        commands::run(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_accepts_flags_after_problem_words() {
        let cli = Cli::parse_from(["planwright", "run", "build", "a", "todo", "app", "-s", "2", "--review"]);
        match cli.command {
            Some(Command::Run(args)) => {
                assert_eq!(args.problem.join(" "), "build a todo app");
                assert_eq!(args.subtask, Some(2));
                assert!(args.review);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn review_requires_subtask() {
        let result = Cli::try_parse_from(["planwright", "run", "x", "--review"]);
        assert!(result.is_err());
    }
}
