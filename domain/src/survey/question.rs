//! Survey answer record

use crate::chat::ChatEntry;
use serde::{Deserialize, Serialize};

/// One participant's answer to one probe firing (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyQuestion {
    pub question_id: String,
    pub question_content: String,
    /// Transcript length when the probe fired
    pub iteration: usize,
    pub chat_entry: ChatEntry,
}

impl SurveyQuestion {
    pub fn new(
        question_id: impl Into<String>,
        question_content: impl Into<String>,
        iteration: usize,
        chat_entry: ChatEntry,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            question_content: question_content.into(),
            iteration,
            chat_entry,
        }
    }
}
