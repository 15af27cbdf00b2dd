//! Severity-tagged console output.
//!
//! Every line the operator sees goes through a [`Reporter`]. Colors come from
//! `colored`, which already honours `NO_COLOR`, `CLICOLOR_FORCE` and tty
//! detection. Write failures are ignored: output is for humans, never for
//! control flow.

use colored::Colorize;
use std::io::{self, Write};

/// Line writer with success/warning/error severities plus plain lines.
pub struct Reporter {
    out: Box<dyn Write>,
}

impl Reporter {
    pub fn new(out: impl Write + 'static) -> Self {
        Self { out: Box::new(out) }
    }

    /// Reporter writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn success(&mut self, message: &str) {
        self.line(&message.green().to_string());
    }

    pub fn warning(&mut self, message: &str) {
        self.line(&message.yellow().to_string());
    }

    pub fn error(&mut self, message: &str) {
        self.line(&message.red().to_string());
    }

    /// Write one uncolored line.
    pub fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text);
        let _ = self.out.flush();
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter").finish_non_exhaustive()
    }
}
