//! Yes/no confirmation before destructive work.

use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Asks the operator a yes/no question.
pub trait Prompt {
    /// Render `question` and block for an answer. `true` means proceed.
    fn confirm(&mut self, question: &str) -> bool;
}

/// Prompt reading answers line by line from a reader.
///
/// Accepts `y`/`yes` in any case. Anything else, including end of input on a
/// non-interactive stdin, is a decline.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr, answers from stdin.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn confirm(&mut self, question: &str) -> bool {
        let _ = write!(self.output, "{} ", format!("{} (Y/N)?", question).cyan());
        let _ = self.output.flush();

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => {
                let _ = writeln!(self.output);
                false
            }
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        }
    }
}

/// Prompt that accepts every question (`--yes`), echoing it for the record.
pub struct AssumeYes<W> {
    output: W,
}

impl AssumeYes<io::Stderr> {
    pub fn stderr() -> Self {
        Self {
            output: io::stderr(),
        }
    }
}

impl<W: Write> Prompt for AssumeYes<W> {
    fn confirm(&mut self, question: &str) -> bool {
        let _ = writeln!(self.output, "{} (Y/N)? y", question);
        true
    }
}
