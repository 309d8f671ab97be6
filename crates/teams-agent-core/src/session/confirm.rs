//! Yes/no confirmation prompt

use super::terminal::Terminal;
use crate::error::Result;

/// Whether an answer means yes (`y` or `yes`, any case)
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Ask a yes/no question; anything but yes (including end of input) is no
pub fn confirm(question: &str, terminal: &mut dyn Terminal) -> Result<bool> {
    let answer = terminal.read_line(&format!("{} (y/n) ", question))?;
    Ok(answer.as_deref().is_some_and(is_affirmative))
}
