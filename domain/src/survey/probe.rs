//! Survey probe definitions

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Iteration marker meaning "when the session has ended"
pub const END_OF_SESSION: i64 = -1;

/// Declared trigger of a survey probe
///
/// Serialized the way session files write it: the keyword `"always"`, or a
/// list of transcript lengths where `-1` stands for the end of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTrigger", into = "RawTrigger")]
pub enum ProbeTrigger {
    /// Fire on every survey pass
    Always,
    /// Fire at the listed transcript lengths, and optionally once the session ended
    At { iterations: Vec<usize>, at_end: bool },
}

impl ProbeTrigger {
    pub fn at_end() -> Self {
        ProbeTrigger::At {
            iterations: Vec::new(),
            at_end: true,
        }
    }

    pub fn at(iterations: impl Into<Vec<usize>>) -> Self {
        ProbeTrigger::At {
            iterations: iterations.into(),
            at_end: false,
        }
    }

    /// Whether the declared trigger matches the given session state
    pub fn matches(&self, transcript_len: usize, ended: bool) -> bool {
        match self {
            ProbeTrigger::Always => true,
            ProbeTrigger::At { iterations, at_end } => {
                iterations.contains(&transcript_len) || (*at_end && ended)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawTrigger {
    Keyword(String),
    List(Vec<i64>),
}

impl TryFrom<RawTrigger> for ProbeTrigger {
    type Error = DomainError;

    fn try_from(raw: RawTrigger) -> Result<Self, Self::Error> {
        match raw {
            RawTrigger::Keyword(k) => match k.trim().to_lowercase().as_str() {
                "always" => Ok(ProbeTrigger::Always),
                "end" => Ok(ProbeTrigger::at_end()),
                other => Err(DomainError::InvalidSurveyQuestion(format!(
                    "unknown trigger keyword '{}'",
                    other
                ))),
            },
            RawTrigger::List(values) => {
                let mut iterations = Vec::with_capacity(values.len());
                let mut at_end = false;
                for v in values {
                    if v == END_OF_SESSION {
                        at_end = true;
                    } else if v >= 0 {
                        iterations.push(v as usize);
                    } else {
                        return Err(DomainError::InvalidSurveyQuestion(format!(
                            "negative trigger iteration {}",
                            v
                        )));
                    }
                }
                Ok(ProbeTrigger::At { iterations, at_end })
            }
        }
    }
}

impl From<ProbeTrigger> for RawTrigger {
    fn from(trigger: ProbeTrigger) -> Self {
        match trigger {
            ProbeTrigger::Always => RawTrigger::Keyword("always".to_string()),
            ProbeTrigger::At { iterations, at_end } => {
                let mut list: Vec<i64> = iterations.into_iter().map(|i| i as i64).collect();
                if at_end {
                    list.push(END_OF_SESSION);
                }
                RawTrigger::List(list)
            }
        }
    }
}

/// A configured survey question (probe)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyProbe {
    pub id: String,
    #[serde(rename = "iterations")]
    pub trigger: ProbeTrigger,
    pub question: String,
}

impl SurveyProbe {
    pub fn new(id: impl Into<String>, trigger: ProbeTrigger, question: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            trigger,
            question: question.into(),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::InvalidSurveyQuestion(
                "survey question id is empty".to_string(),
            ));
        }
        if self.question.trim().is_empty() {
            return Err(DomainError::InvalidSurveyQuestion(format!(
                "survey question '{}' has no text",
                self.id
            )));
        }
        Ok(())
    }
}
