//! Prompt domain
//!
//! Prompt layouts a participant uses to turn a scenario and a transcript
//! into the message list it sends to a generator.

mod template;

pub use template::{PromptTemplate, PromptVersion};
