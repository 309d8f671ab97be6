//! Interactive terminal abstraction
//!
//! The chat loop and the approval prompt share one terminal handle. The loop
//! pauses it while a turn runs and resumes it once the turn is over; nested
//! questions still read through the same handle while it is paused.

use crate::error::Result;

/// How a line should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Plain,
    /// Banner shown when the session starts
    Welcome,
    /// Banner shown when the session ends
    Farewell,
    /// Authorization and approval progress
    Status,
    /// Messages produced by the agent
    Assistant,
    Error,
}

/// Line-oriented user interaction
pub trait Terminal {
    /// Show `prompt` and read one line; `None` at end of input
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    fn write_line(&mut self, style: LineStyle, text: &str);

    /// Stop accepting top-level input
    fn pause(&mut self);

    /// Accept top-level input again
    fn resume(&mut self);
}
