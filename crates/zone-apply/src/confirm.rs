//! Interactive commit confirmation

use std::io::{self, BufRead, Write};

/// Asks the operator a question and returns the raw answer line
#[cfg_attr(test, mockall::automock)]
pub trait Confirm: Send + Sync {
    fn ask(&self, prompt: &str) -> io::Result<String>;
}

/// Only a single `Y` or `y` proceeds; anything else, empty input included,
/// declines
pub fn accepts(answer: &str) -> bool {
    matches!(answer.trim_end_matches(['\r', '\n']), "Y" | "y")
}

/// Prompt on stdout, answer from stdin
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn ask(&self, prompt: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer)
    }
}
