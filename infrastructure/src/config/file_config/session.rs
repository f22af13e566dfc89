//! Session loop configuration from TOML (`[session]` section)

use parley_application::RunParams;
use parley_domain::{PromptVersion, SurveyPolicy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Default prompt layout ("v0", "v1" or "v2")
    pub prompt_version: String,
    /// Abort a session after this many turns (unset: run until the end type fires)
    pub max_turns: Option<usize>,
    pub survey_policy: SurveyPolicy,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            prompt_version: PromptVersion::default().to_string(),
            max_turns: None,
            survey_policy: SurveyPolicy::default(),
        }
    }
}

impl FileSessionConfig {
    pub fn to_run_params(&self) -> RunParams {
        RunParams::default()
            .with_prompt_version(&self.prompt_version)
            .with_max_turns(self.max_turns)
            .with_survey_policy(self.survey_policy)
    }
}
