//! Console terminal backed by rustyline

use console::style;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use teams_agent_core::session::{LineStyle, Terminal};
use teams_agent_core::{Error, Result};

/// Line editor on stdin/stdout
///
/// Only top-level input goes into the history; answers given while a turn
/// is running (approval questions) are not recorded.
pub struct ConsoleTerminal {
    editor: DefaultEditor,
    paused: bool,
}

impl ConsoleTerminal {
    pub fn new() -> rustyline::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            paused: false,
        })
    }
}

impl Terminal for ConsoleTerminal {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !self.paused && !line.is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            // Ctrl-D / Ctrl-C end the session like `exit`
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => Ok(None),
            Err(ReadlineError::Io(e)) => Err(Error::Io(e)),
            Err(e) => Err(Error::Io(std::io::Error::other(e.to_string()))),
        }
    }

    fn write_line(&mut self, line_style: LineStyle, text: &str) {
        match line_style {
            LineStyle::Plain | LineStyle::Assistant => println!("{}", text),
            LineStyle::Welcome => println!("{}", style(text).green().bold()),
            LineStyle::Farewell => println!("{}", style(text).red().bold()),
            LineStyle::Status => println!("{}", style(text).cyan()),
            LineStyle::Error => eprintln!("{}", style(text).red()),
        }
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }
}
