//! Interrupt resolution
//!
//! Turns one interrupt into one decision: authorization interrupts wait for
//! the user to finish the OAuth flow in a browser, approval interrupts ask
//! the user. Every interrupt is handled on its own, nothing carries over.

use tracing::{debug, warn};

use super::confirm::confirm;
use super::terminal::{LineStyle, Terminal};
use crate::agent::{Decision, Interrupt, InterruptValue};
use crate::arcade::{AuthWaiter, AuthorizationResponse};

/// Prefix of authorization and approval progress lines
pub const STATUS_PREFIX: &str = "⚙️: ";

fn status(terminal: &mut dyn Terminal, text: &str) {
    terminal.write_line(LineStyle::Status, &format!("{}{}", STATUS_PREFIX, text));
}

/// Resolve one interrupt into a decision for the agent
pub async fn handle_interrupt(interrupt: &Interrupt, terminal: &mut dyn Terminal, waiter: &dyn AuthWaiter) -> Decision {
    debug!(interrupt_id = %interrupt.id, "Handling interrupt");
    match &interrupt.value {
        InterruptValue::Authorization {
            tool_name,
            authorization_response,
        } => authorize(tool_name, authorization_response, terminal, waiter).await,
        InterruptValue::Approval { tool_name, input } => {
            status(terminal, &format!("Human in the loop required for tool call {}", tool_name));
            status(terminal, &format!("Please approve the tool call {}", input));
            match confirm("Do you approve this tool call?", terminal) {
                Ok(true) => Decision::approve(),
                Ok(false) => Decision::deny(),
                Err(e) => {
                    warn!(tool = %tool_name, error = %e, "Could not read approval answer");
                    terminal.write_line(LineStyle::Error, &format!("Could not read your answer: {}", e));
                    Decision::deny()
                }
            }
        }
        InterruptValue::Unknown(payload) => {
            warn!(interrupt_id = %interrupt.id, payload = %payload, "Unrecognized interrupt");
            status(terminal, "Received an interrupt this client does not understand; declining it");
            Decision::deny()
        }
    }
}

async fn authorize(
    tool_name: &str,
    response: &AuthorizationResponse,
    terminal: &mut dyn Terminal,
    waiter: &dyn AuthWaiter,
) -> Decision {
    status(terminal, &format!("Authorization required for tool call {}", tool_name));
    status(
        terminal,
        &format!(
            "Please authorize in your browser {}",
            response.url.as_deref().unwrap_or("(no URL provided)")
        ),
    );
    status(terminal, "Waiting for you to complete authorization...");

    let Some(id) = response.id.as_deref() else {
        warn!(tool = %tool_name, "Authorization response has no id");
        terminal.write_line(LineStyle::Error, "Error in authorization: the response has no authorization id");
        return Decision::deny();
    };

    match waiter.wait_for_completion(id).await {
        Ok(_) => {
            status(terminal, "Authorization granted. Resuming execution...");
            Decision::approve()
        }
        Err(e) => {
            warn!(tool = %tool_name, error = %e, "Authorization wait failed");
            terminal.write_line(LineStyle::Error, &format!("Error in authorization: {}", e));
            Decision::deny()
        }
    }
}
