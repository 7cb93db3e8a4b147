use anyhow::Result;
use colored::*;
use std::io::{self, Write};

use crate::agent::{Orchestrator, Session};

use super::render;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionCommand {
    Plan(String),
    CodeAt(usize),
    Code(String),
    Review,
    Show,
    History,
    Help,
    Quit,
}

pub(crate) fn parse_command(line: &str) -> Result<SessionCommand, String> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head.to_ascii_lowercase().as_str() {
        "plan" | "p" => {
            if rest.is_empty() {
                Err("Usage: plan <problem description>".to_string())
            } else {
                Ok(SessionCommand::Plan(rest.to_string()))
            }
        }
        "code" | "c" => {
            if rest.is_empty() {
                Err("Usage: code <subtask number or text>".to_string())
            } else if let Ok(position) = rest.parse::<usize>() {
                Ok(SessionCommand::CodeAt(position))
            } else {
                Ok(SessionCommand::Code(rest.to_string()))
            }
        }
        "review" | "r" => Ok(SessionCommand::Review),
        "show" | "s" => Ok(SessionCommand::Show),
        "history" => Ok(SessionCommand::History),
        "help" | "h" | "?" => Ok(SessionCommand::Help),
        "quit" | "q" | "exit" => Ok(SessionCommand::Quit),
        "" => Ok(SessionCommand::Help),
        other => Err(format!("Unknown command '{other}'. Type `help` for options.")),
    }
}

pub(crate) async fn run_session(orchestrator: &Orchestrator) -> Result<()> {
    let mut session = Session::new();

    println!("{}", "🧭 planwright session".bold().cyan());
    print_help();

    loop {
        print!("\n{} ", format!("[{}]>", session.phase()).bold());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            println!();
            break;
        }

        let command = match parse_command(&input) {
            Ok(command) => command,
            Err(message) => {
                println!("❌ {message}");
                continue;
            }
        };

        let result = match command {
            SessionCommand::Plan(problem) => orchestrator
                .submit_problem(&mut session, &problem)
                .await
                .map(|report| render::render_plan(&report)),
            SessionCommand::CodeAt(position) => orchestrator
                .generate_code_at(&mut session, position)
                .await
                .map(|output| render::render_code(&output)),
            SessionCommand::Code(subtask) => orchestrator
                .generate_code(&mut session, &subtask)
                .await
                .map(|output| render::render_code(&output)),
            SessionCommand::Review => orchestrator
                .review_code(&mut session)
                .await
                .map(|review| render::render_review(&review)),
            SessionCommand::Show => {
                render::render_session(&session);
                Ok(())
            }
            SessionCommand::History => {
                render::render_history(&session);
                Ok(())
            }
            SessionCommand::Help => {
                print_help();
                Ok(())
            }
            SessionCommand::Quit => break,
        };

        if let Err(error) = result {
            render::render_error(&error);
        }
    }

    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  {}  break a problem into subtasks", "plan <problem>".cyan());
    println!("  {}  generate code for a subtask", "code <n|text>".cyan());
    println!("  {}          review the current code", "review".cyan());
    println!("  {}            show the session state", "show".cyan());
    println!("  {}         list what happened so far", "history".cyan());
    println!("  {}            leave the session", "quit".cyan());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plan_with_problem_text() {
        assert_eq!(
            parse_command("  plan   Build a todo app  "),
            Ok(SessionCommand::Plan("Build a todo app".to_string()))
        );
        assert!(parse_command("plan").is_err());
    }

    #[test]
    fn code_accepts_position_or_text() {
        assert_eq!(parse_command("code 2"), Ok(SessionCommand::CodeAt(2)));
        assert_eq!(
            parse_command("c CRUD API"),
            Ok(SessionCommand::Code("CRUD API".to_string()))
        );
        assert!(parse_command("code").is_err());
    }

    #[test]
    fn simple_commands_and_unknowns() {
        assert_eq!(parse_command("REVIEW"), Ok(SessionCommand::Review));
        assert_eq!(parse_command("show"), Ok(SessionCommand::Show));
        assert_eq!(parse_command("history"), Ok(SessionCommand::History));
        assert_eq!(parse_command("exit"), Ok(SessionCommand::Quit));
        assert_eq!(parse_command(""), Ok(SessionCommand::Help));
        assert!(parse_command("deploy now").is_err());
    }
}
