//! One streamed agent turn

use futures::StreamExt;
use tracing::debug;

use super::terminal::{LineStyle, Terminal};
use crate::agent::{Agent, AgentInput, Interrupt, RunnableConfig, StreamChunk};
use crate::error::Result;
use crate::formatting::format_message;

/// Prefix of agent output lines
pub const ASSISTANT_PREFIX: &str = "🤖: ";

/// Stream one run of the agent, printing its messages
///
/// Returns the interrupts raised during the run, in the order they were
/// streamed. An empty list means the turn is complete.
pub async fn stream_agent(
    agent: &Agent,
    input: AgentInput,
    config: &RunnableConfig,
    terminal: &mut dyn Terminal,
) -> Result<Vec<Interrupt>> {
    let mut interrupts = Vec::new();
    let mut stream = agent.stream(input, config);

    while let Some(chunk) = stream.next().await {
        match chunk? {
            StreamChunk::Interrupts(raised) => interrupts.extend(raised),
            StreamChunk::Updates(updates) => {
                for update in updates {
                    debug!(node = %update.node, messages = update.messages.len(), "Node update");
                    for message in &update.messages {
                        terminal.write_line(
                            LineStyle::Assistant,
                            &format!("{}{}", ASSISTANT_PREFIX, format_message(message)),
                        );
                    }
                }
            }
        }
    }

    Ok(interrupts)
}
