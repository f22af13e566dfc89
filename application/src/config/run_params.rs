//! Run parameters: session loop control.
//!
//! [`RunParams`] groups the settings a caller chooses per run, as opposed
//! to the session file which describes the conversation itself.

use parley_domain::SurveyPolicy;
use serde::{Deserialize, Serialize};

/// Session loop control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunParams {
    /// Prompt layout passed through to participants unchanged.
    pub prompt_version: String,
    /// Abort after this many turns if the end type has not fired yet.
    ///
    /// `None` lets a session whose participants keep declining run forever.
    pub max_turns: Option<usize>,
    /// Which survey probes fire on each pass.
    pub survey_policy: SurveyPolicy,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            prompt_version: "v0".to_string(),
            max_turns: None,
            survey_policy: SurveyPolicy::default(),
        }
    }
}

impl RunParams {
    pub fn with_prompt_version(mut self, version: impl Into<String>) -> Self {
        self.prompt_version = version.into();
        self
    }

    pub fn with_max_turns(mut self, max: Option<usize>) -> Self {
        self.max_turns = max;
        self
    }

    pub fn with_survey_policy(mut self, policy: SurveyPolicy) -> Self {
        self.survey_policy = policy;
        self
    }
}
