// Interactive REPL
//
// Thin terminal front-end over the chat engine. All state lives in the
// engine; the loop only reads lines, dispatches slash commands and prints
// replies with their suggestions or resources.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::engine::{BotResponse, SupportEngine};
use crate::report::{synthesize, ReportRenderer, TextRenderer};
use crate::screening::{Factor, FactorValue};

pub struct Repl {
    engine: SupportEngine,
}

impl Repl {
    pub fn new(engine: SupportEngine) -> Self {
        Self { engine }
    }

    /// Run the interactive loop until /quit or EOF.
    pub fn run(mut self) -> Result<()> {
        println!("safemind ({} profile)", self.engine.profile());
        println!("Type /help for commands, /quit to exit.\n");

        let mut editor = DefaultEditor::new()?;

        loop {
            let line = match editor.readline("you> ") {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    println!("Take care of yourself. Goodbye.");
                    break;
                }
                Err(e) => return Err(e.into()),
            };

            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            editor.add_history_entry(input)?;

            if input.starts_with('/') {
                if self.handle_command(input)? {
                    break;
                }
                continue;
            }

            let response = self.engine.get_response(input);
            print_response(&response);
        }

        Ok(())
    }

    /// Returns true when the loop should exit.
    fn handle_command(&mut self, command: &str) -> Result<bool> {
        let mut parts = command.splitn(3, ' ');
        let name = parts.next().unwrap_or("");

        match name {
            "/quit" | "/exit" => {
                println!("Take care of yourself. Goodbye.");
                return Ok(true);
            }
            "/help" => show_help(),
            "/report" => self.show_report(),
            "/resources" => {
                println!("Crisis resources:");
                for resource in self.engine.crisis_resources() {
                    println!("  - {resource}");
                }
            }
            "/factors" => {
                if self.engine.factors().answered_count() == 0 {
                    println!("No screening factors recorded yet.");
                } else {
                    for (factor, value) in self.engine.factors().answered() {
                        println!("  {factor} = {value}");
                    }
                }
            }
            "/set" => match (parts.next(), parts.next()) {
                (Some(factor), Some(value)) => match factor.parse::<Factor>() {
                    Ok(factor) => {
                        self.engine.set_factor(factor, FactorValue::parse(value));
                        println!("Recorded {factor}.");
                    }
                    Err(e) => println!("{e}"),
                },
                _ => println!("Usage: /set <factor> <value>"),
            },
            "/save" => match parts.next() {
                Some(path) => {
                    self.engine.history().save(path)?;
                    println!("History saved to {path}.");
                }
                None => println!("Usage: /save <path>"),
            },
            "/clear" => {
                // Keep the configured engine (keyword overrides included),
                // only the conversation state goes.
                self.engine.reset();
                println!("Conversation cleared.");
            }
            _ => {
                println!("Unknown command: {command}");
                println!("Type /help for available commands.");
            }
        }

        Ok(false)
    }

    fn show_report(&self) {
        match synthesize(
            self.engine.profile(),
            self.engine.history(),
            self.engine.factors(),
        ) {
            Some(report) => println!("\n{}", TextRenderer::new().render(&report)),
            None => println!("No conversation data available yet."),
        }
    }
}

fn print_response(response: &BotResponse) {
    println!("\n{}\n", response.reply());

    let resources = response.resources();
    if !resources.is_empty() {
        println!("Resources:");
        for resource in resources {
            println!("  - {resource}");
        }
        println!();
    }

    let suggestions = response.suggestions();
    if !suggestions.is_empty() {
        println!("Suggestions:");
        for suggestion in suggestions {
            println!("  - {suggestion}");
        }
        println!();
    }
}

fn show_help() {
    println!("Available commands:");
    println!("  /help       - Show this help message");
    println!("  /report     - Generate a risk report for this conversation");
    println!("  /resources  - List crisis resources");
    println!("  /factors    - Show recorded screening answers");
    println!("  /set <factor> <value> - Record a screening answer");
    println!("  /save <path> - Save the conversation history as JSON");
    println!("  /clear      - Clear the conversation");
    println!("  /quit       - Exit");
}
