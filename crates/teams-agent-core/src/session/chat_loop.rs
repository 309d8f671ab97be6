//! Read-eval-print loop
//!
//! ```text
//!  Idle ──line──▶ Turn-Active ──no interrupts──▶ Idle
//!   │                 │  ▲
//!   │           interrupts│  │ Command { resume }
//!   │                 ▼  │
//!   │            handle each interrupt
//!   │
//!   └──"exit" / EOF──▶ Terminating
//! ```

use tracing::{error, info};

use super::interrupt::handle_interrupt;
use super::terminal::{LineStyle, Terminal};
use super::turn::stream_agent;
use crate::agent::{Agent, AgentInput, Command, RunnableConfig};
use crate::arcade::AuthWaiter;
use crate::error::Result;

pub const WELCOME_BANNER: &str = "Welcome to the chatbot! Type 'exit' to quit.";
pub const FAREWELL_BANNER: &str = "👋 Bye...";
pub const INPUT_PROMPT: &str = "> ";

/// Whether a line ends the session; no trimming
pub fn is_exit(line: &str) -> bool {
    line.to_lowercase() == "exit"
}

/// One interactive session bound to a single conversation thread
pub struct ChatLoop<'a> {
    agent: &'a Agent,
    waiter: &'a dyn AuthWaiter,
    config: RunnableConfig,
}

impl<'a> ChatLoop<'a> {
    pub fn new(agent: &'a Agent, waiter: &'a dyn AuthWaiter, config: RunnableConfig) -> Self {
        Self { agent, waiter, config }
    }

    /// Run until the user types `exit` or input ends
    ///
    /// Errors during a turn are reported and the loop goes on; only a failure
    /// to read from the terminal ends the loop early.
    pub async fn run(&self, terminal: &mut dyn Terminal) -> Result<()> {
        info!(thread_id = %self.config.thread_id, "Chat session started");
        terminal.write_line(LineStyle::Welcome, WELCOME_BANNER);

        while let Some(line) = terminal.read_line(INPUT_PROMPT)? {
            if is_exit(&line) {
                break;
            }

            terminal.pause();
            if let Err(e) = self.run_turn(&line, terminal).await {
                error!(error = %e, "Turn failed");
                terminal.write_line(LineStyle::Error, &format!("Error: {}", e));
            }
            terminal.resume();
        }

        terminal.write_line(LineStyle::Farewell, FAREWELL_BANNER);
        info!(thread_id = %self.config.thread_id, "Chat session ended");
        Ok(())
    }

    /// Run one user turn through every interrupt/resume cycle
    pub async fn run_turn(&self, line: &str, terminal: &mut dyn Terminal) -> Result<()> {
        let mut input = AgentInput::user(line);
        loop {
            let interrupts = stream_agent(self.agent, input, &self.config, terminal).await?;
            if interrupts.is_empty() {
                return Ok(());
            }

            let mut decisions = Vec::with_capacity(interrupts.len());
            for interrupt in &interrupts {
                decisions.push(handle_interrupt(interrupt, terminal, self.waiter).await);
            }
            input = Command::from_decisions(decisions).into();
        }
    }
}
