//! Interactive terminal prompts

use crate::core::prompt::Prompt;
use dialoguer::console::Term;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use std::io::{self, BufRead, IsTerminal, Write};
use tracing::debug;

/// Prompt backed by the controlling terminal.
///
/// When stdin is not a terminal, answers are read line by line from it so
/// that selections can be piped in.
#[derive(Default)]
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    fn interactive() -> bool {
        io::stdin().is_terminal() && Term::stderr().is_term()
    }
}

impl Prompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> bool {
        if !Self::interactive() {
            let question = format!("{} [y/N]", message);
            return match read_answer(io::stdin().lock(), io::stderr(), &question) {
                Ok(answer) => is_yes(&answer),
                Err(e) => {
                    debug!("Could not read confirmation: {}", e);
                    false
                }
            };
        }

        Confirm::with_theme(&self.theme)
            .with_prompt(message)
            .default(false)
            .interact()
            .unwrap_or_else(|e| {
                debug!("Confirmation prompt failed: {}", e);
                false
            })
    }

    fn input(&self, prompt: &str) -> io::Result<String> {
        if !Self::interactive() {
            return read_answer(io::stdin().lock(), io::stderr(), prompt);
        }

        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map(|answer| answer.trim().to_string())
            .map_err(io::Error::other)
    }
}

/// Write `prompt` to `writer` and read one trimmed line from `reader`.
///
/// End of input before any line is an `UnexpectedEof` error.
fn read_answer<R: BufRead, W: Write>(mut reader: R, mut writer: W, prompt: &str) -> io::Result<String> {
    write!(writer, "{}: ", prompt)?;
    writer.flush()?;

    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no answer on standard input",
        ));
    }
    Ok(line.trim().to_string())
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes")
}
