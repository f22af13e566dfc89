//! Presentation layer for parley
//!
//! This crate contains CLI definitions, console formatting, progress
//! reporters, and the participant typed at the terminal.

pub mod cli;
pub mod output;
pub mod participants;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{
    BatchArgs, Cli, Command, InspectArgs, ResumeArgs, RunArgs, SessionOutputArgs,
};
pub use output::console::ConsoleFormatter;
pub use participants::{
    HUMAN_CLASS, HumanParticipant, TerminalInput, register_interactive, register_interactive_with,
};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
