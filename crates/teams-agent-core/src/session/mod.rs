//! Interactive chat session
//!
//! - `ChatLoop`: reads lines, runs turns, resolves interrupts, resumes
//! - `stream_agent`: drives one streamed run and collects its interrupts
//! - `handle_interrupt`: authorization wait or user approval for one interrupt
//! - `confirm`: yes/no prompt
//! - `Terminal`: the input/output handle everything above shares

mod chat_loop;
mod confirm;
mod interrupt;
mod terminal;
mod turn;

pub use chat_loop::{is_exit, ChatLoop, FAREWELL_BANNER, INPUT_PROMPT, WELCOME_BANNER};
pub use confirm::{confirm, is_affirmative};
pub use interrupt::{handle_interrupt, STATUS_PREFIX};
pub use terminal::{LineStyle, Terminal};
pub use turn::{stream_agent, ASSISTANT_PREFIX};
