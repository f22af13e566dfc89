//! Output aggregate of a session run

use crate::chat::ChatEntry;
use crate::survey::SurveyQuestion;
use serde::{Deserialize, Serialize};

/// Everything a run produced, ready for serialization
///
/// `chat_entry` mirrors every transcript append made during the run, in
/// order. It holds its own copies, so handing it out never exposes the
/// session's transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutput {
    #[serde(default)]
    pub chat_entry: Vec<ChatEntry>,
    #[serde(default)]
    pub survey_question: Vec<SurveyQuestion>,
}

impl SessionOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_entry(&mut self, entry: ChatEntry) {
        self.chat_entry.push(entry);
    }

    pub fn record_survey(&mut self, question: SurveyQuestion) {
        self.survey_question.push(question);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let mut output = SessionOutput::new();
        output.record_entry(ChatEntry::system("hello"));
        output.record_survey(SurveyQuestion::new(
            "intro",
            "0-10?",
            0,
            ChatEntry::system("7"),
        ));

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["chat_entry"][0]["answer"], "hello");
        assert_eq!(json["survey_question"][0]["question_id"], "intro");
        assert_eq!(json["survey_question"][0]["iteration"], 0);
        assert_eq!(json["survey_question"][0]["chat_entry"]["answer"], "7");
    }
}
