use std::io::{self, Write};

use anyhow::Result;
use cliclack::spinner;
use console::style;
use rustyline::error::ReadlineError;
use vane::models::message::{Message, MessageContent};

use super::{Input, InputType, Prompt};

const PROMPT: &str = "You: ";

pub struct RustylinePrompt {
    editor: rustyline::DefaultEditor,
    spinner: cliclack::ProgressBar,
}

impl RustylinePrompt {
    pub fn new() -> Result<Self> {
        Ok(RustylinePrompt {
            editor: rustyline::DefaultEditor::new()?,
            spinner: spinner(),
        })
    }
}

impl Prompt for RustylinePrompt {
    fn render(&mut self, message: &Message) {
        for message_content in &message.content {
            match message_content {
                MessageContent::Text(text) => {
                    if !text.is_empty() {
                        println!("Assistant: {}", text);
                    }
                }
                MessageContent::ToolRequest(tool_request) => {
                    if let Ok(call) = &tool_request.tool_call {
                        if call.name == "get_weather" {
                            let location = call
                                .arguments
                                .get("location")
                                .and_then(|v| v.as_str())
                                .unwrap_or("unknown");
                            println!(
                                "{}",
                                style(format!("[System: Fetching weather for {}...]", location))
                                    .dim()
                            );
                        }
                    }
                }
                // Tool output goes back to the model, not the console.
                MessageContent::ToolResponse(_) => {}
            }
        }

        io::stdout().flush().expect("Failed to flush stdout");
    }

    fn get_input(&mut self) -> Result<Input> {
        let line = match self.editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                return Ok(Input {
                    input_type: InputType::Exit,
                    content: None,
                });
            }
            Err(e) => {
                eprintln!("Input error: {}", e);
                return Ok(Input {
                    input_type: InputType::Exit,
                    content: None,
                });
            }
        };

        let message_text = line.trim().to_string();
        if message_text.is_empty() {
            return Ok(Input {
                input_type: InputType::AskAgain,
                content: None,
            });
        }

        let _ = self.editor.add_history_entry(&message_text);
        Ok(Input {
            input_type: InputType::Message,
            content: Some(message_text),
        })
    }

    fn show_busy(&mut self) {
        self.spinner = spinner();
        self.spinner.start("awaiting reply");
    }

    fn hide_busy(&self) {
        self.spinner.stop("");
    }

    fn close(&self) {
        // No cleanup required
    }
}
