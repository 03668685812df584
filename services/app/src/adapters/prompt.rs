//! services/app/src/adapters/prompt.rs
//!
//! Terminal implementation of the `Prompt` port: confirmations are read from
//! stdin, alerts are written to stderr.

use dashboard_core::ports::Prompt;
use std::io::{self, BufRead, Write};

pub struct TerminalPrompt {
    assume_yes: bool,
}

impl TerminalPrompt {
    /// With `assume_yes` every confirmation is accepted without asking.
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Prompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let mut stderr = io::stderr();
        if write!(stderr, "{} [y/N] ", message).and_then(|_| stderr.flush()).is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }

    fn alert(&self, message: &str) {
        eprintln!("! {}", message);
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("nope"));
    }

    #[test]
    fn assume_yes_skips_the_question() {
        assert!(TerminalPrompt::new(true).confirm("Delete?"));
    }
}
