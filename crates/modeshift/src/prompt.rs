//! `Prompter` implementations: the dialoguer menu and flag-driven subcommands.

use std::io::{self, IsTerminal};

use dialoguer::{Confirm, Input, Select};
use owo_colors::OwoColorize;
use strum::IntoEnumIterator;

use modeshift_core::{CoreError, Prompter, Task, TaskReport};

use crate::output;

fn prompt_failed(e: impl std::fmt::Display) -> CoreError {
    CoreError::Prompt {
        reason: e.to_string(),
    }
}

/// Ask yes/no on the terminal, or fail when there is no terminal to ask on.
fn confirm_on_terminal(message: &str) -> Result<bool, CoreError> {
    if !io::stdin().is_terminal() {
        return Err(CoreError::Prompt {
            reason: "confirmation required; pass --yes to run non-interactively".into(),
        });
    }
    Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_failed)
}

// ── Interactive menu ────────────────────────────────────────────────

pub struct MenuPrompter {
    yes: bool,
    quiet: bool,
    color: bool,
}

impl MenuPrompter {
    pub fn new(yes: bool, quiet: bool) -> Self {
        Self {
            yes,
            quiet,
            color: output::should_color(),
        }
    }
}

impl Prompter for MenuPrompter {
    fn choose_task(&mut self) -> Result<Task, CoreError> {
        let items: Vec<String> = Task::iter()
            .map(|t| format!("{}. {t}", t.number()))
            .collect();
        let index = Select::new()
            .with_prompt("Select a task")
            .items(&items)
            .default(0)
            .interact()
            .map_err(prompt_failed)?;
        Ok(Task::iter().nth(index).unwrap_or(Task::Exit))
    }

    fn system_ip(&mut self) -> Result<String, CoreError> {
        Input::<String>::new()
            .with_prompt("Device system IP")
            .validate_with(|s: &String| {
                if s.trim().is_empty() {
                    Err("system IP cannot be empty")
                } else {
                    Ok(())
                }
            })
            .interact_text()
            .map_err(prompt_failed)
    }

    fn destination(&mut self, suggested: &str) -> Result<String, CoreError> {
        Input::<String>::new()
            .with_prompt("Output file")
            .default(suggested.to_owned())
            .interact_text()
            .map_err(prompt_failed)
    }

    fn confirm(&mut self, message: &str) -> Result<bool, CoreError> {
        if self.yes {
            return Ok(true);
        }
        confirm_on_terminal(message)
    }

    fn show_report(&mut self, report: &TaskReport) {
        output::print_output(&output::render_report(report, self.color), self.quiet);
    }

    fn show_error(&mut self, error: &CoreError) {
        if self.color {
            eprintln!("{} {error}", "error:".red().bold());
        } else {
            eprintln!("error: {error}");
        }
    }
}

// ── Subcommand arguments ────────────────────────────────────────────

/// Answers workflow questions from command-line arguments.
#[derive(Debug, Default)]
pub struct ArgsPrompter {
    pub system_ip: Option<String>,
    pub destination: Option<String>,
    pub yes: bool,
}

impl Prompter for ArgsPrompter {
    fn choose_task(&mut self) -> Result<Task, CoreError> {
        Err(CoreError::Prompt {
            reason: "no task menu outside interactive mode".into(),
        })
    }

    fn system_ip(&mut self) -> Result<String, CoreError> {
        self.system_ip.take().ok_or_else(|| CoreError::Prompt {
            reason: "--system-ip is required".into(),
        })
    }

    fn destination(&mut self, suggested: &str) -> Result<String, CoreError> {
        Ok(self
            .destination
            .take()
            .unwrap_or_else(|| suggested.to_owned()))
    }

    fn confirm(&mut self, message: &str) -> Result<bool, CoreError> {
        if self.yes {
            return Ok(true);
        }
        confirm_on_terminal(message)
    }
}
