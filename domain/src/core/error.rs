//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// These are all configuration problems: a session whose pieces fail to
/// validate never starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No participants configured for the session")]
    EmptyRoster,

    #[error("Start index {index} is out of range for a roster of {roster_len}")]
    StartIndexOutOfRange { index: usize, roster_len: usize },

    #[error("Unknown host kind: {0}")]
    UnknownHostKind(String),

    #[error("Unknown end type: {0}")]
    UnknownEndType(String),

    #[error("Invalid survey question: {0}")]
    InvalidSurveyQuestion(String),

    #[error("Invalid survey policy: {0}")]
    InvalidSurveyPolicy(String),

    #[error("Unknown prompt version: {0}. Please use v0, v1 or v2")]
    UnknownPromptVersion(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_roster_display() {
        let error = DomainError::EmptyRoster;
        assert_eq!(error.to_string(), "No participants configured for the session");
    }
}
