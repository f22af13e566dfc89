//! Conversation transcript domain.
//!
//! - [`persona::Persona`]: immutable identity of a participant
//! - [`entry::ChatEntry`]: one utterance, with the prompt that produced it
//! - [`message::Message`]: a role/content pair of a prompt

pub mod entry;
pub mod message;
pub mod persona;

pub use entry::{ChatEntry, SYSTEM_NAME, Speaker};
pub use message::{Message, Role};
pub use persona::Persona;
