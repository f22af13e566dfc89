//! Termination domain
//!
//! End types decide when a session is over. They only look at the
//! transcript they are handed, so a session restored from a snapshot ends
//! exactly where the original would have.

use crate::chat::ChatEntry;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Capability every termination policy provides
pub trait EndPolicy: Send + Sync {
    fn did_end(&self, transcript: &[ChatEntry]) -> bool;
}

/// Configured termination policies, as named in session files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "lowercase")]
pub enum EndType {
    /// Stop once the transcript holds `max_num_msgs` entries
    Iteration { max_num_msgs: usize },
}

impl EndType {
    pub fn iteration(max_num_msgs: usize) -> Self {
        EndType::Iteration { max_num_msgs }
    }

    /// Build an end type from its class name and threshold
    pub fn from_class(class: &str, max_num_msgs: usize) -> Result<Self, DomainError> {
        match class.trim().to_lowercase().as_str() {
            "iteration" => Ok(EndType::iteration(max_num_msgs)),
            _ => Err(DomainError::UnknownEndType(class.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EndType::Iteration { .. } => "iteration",
        }
    }
}

impl EndPolicy for EndType {
    fn did_end(&self, transcript: &[ChatEntry]) -> bool {
        match self {
            EndType::Iteration { max_num_msgs } => transcript.len() >= *max_num_msgs,
        }
    }
}

impl std::fmt::Display for EndType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndType::Iteration { max_num_msgs } => write!(f, "after {} messages", max_num_msgs),
        }
    }
}
