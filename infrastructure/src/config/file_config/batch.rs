//! Batch configuration from TOML (`[batch]` section)

use parley_application::DEFAULT_MAX_WORKERS;
use parley_domain::PromptVersion;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBatchConfig {
    pub max_workers: usize,
    /// Repetitions per configuration directory (`config_0.json` ..)
    pub repetitions: usize,
    /// Label embedded in output file names
    pub llm_name: String,
    pub prompt_versions: Vec<String>,
}

impl Default for FileBatchConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            repetitions: 5,
            llm_name: "mistral-7b".to_string(),
            prompt_versions: PromptVersion::all()
                .iter()
                .map(|v| v.as_str().to_string())
                .collect(),
        }
    }
}
