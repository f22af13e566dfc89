//! File-backed batch job runner

use crate::config::load_session_config;
use crate::logging::JsonlConversationLogger;
use crate::persistence::write_output_json;
use async_trait::async_trait;
use parley_application::{
    JobError, RunParams, RunSessionInput, RunSessionUseCase, SessionJob, SessionJobRunner,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Runs a [`SessionJob`] from its config file to its output file
pub struct FileSessionJobRunner {
    use_case: RunSessionUseCase,
    params: RunParams,
    pretty_print: bool,
    conversation_log_dir: Option<PathBuf>,
}

impl FileSessionJobRunner {
    /// `params` supplies the turn guard and survey policy; the prompt
    /// version always comes from the job
    pub fn new(use_case: RunSessionUseCase, params: RunParams) -> Self {
        Self {
            use_case,
            params,
            pretty_print: true,
            conversation_log_dir: None,
        }
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Write one JSONL transcript per job into `dir`
    pub fn with_conversation_log_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.conversation_log_dir = dir;
        self
    }

    fn use_case_for(&self, job: &SessionJob) -> RunSessionUseCase {
        let Some(dir) = &self.conversation_log_dir else {
            return self.use_case.clone();
        };
        let stem = job
            .output_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("job_{}", job.repetition));
        let parent = job
            .output_path
            .parent()
            .and_then(|p| p.file_name())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let path = dir.join(format!("{parent}_{stem}.jsonl"));
        match JsonlConversationLogger::new(&path) {
            Some(logger) => self.use_case.clone().with_conversation_logger(Arc::new(logger)),
            None => self.use_case.clone(),
        }
    }
}

#[async_trait]
impl SessionJobRunner for FileSessionJobRunner {
    fn is_complete(&self, job: &SessionJob) -> bool {
        std::fs::metadata(&job.output_path)
            .map(|m| m.is_file() && m.len() > 0)
            .unwrap_or(false)
    }

    async fn run_job(&self, job: &SessionJob) -> Result<(), JobError> {
        let config =
            load_session_config(&job.config_path).map_err(|e| JobError(e.to_string()))?;
        let params = self
            .params
            .clone()
            .with_prompt_version(job.prompt_version.clone());
        debug!("Starting {}", job);

        let output = self
            .use_case_for(job)
            .execute(RunSessionInput::new(config, params))
            .await
            .map_err(|e| JobError(e.to_string()))?;

        write_output_json(&output, &job.output_path, self.pretty_print)
            .map_err(|e| JobError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileConfig;
    use crate::participants::default_registry;
    use crate::persistence::JsonSessionStore;
    use parley_application::RunBatchUseCase;
    use parley_domain::SessionOutput;

    const SESSION: &str = r#"{
        "experiment": {
            "scenario": "Tempolimit auf Autobahnen",
            "survey_questions": [{"id": "score", "iterations": "always", "question": "0-10?"}]
        },
        "host": {"class": "Round Robin Host", "start_person_index": 0},
        "persons": [
            {"class": "fake", "name": "Anna", "answers": ["Ja", "Vielleicht"]},
            {"class": "fake", "name": "Ben", "survey_answer": "2"}
        ],
        "endType": {"class": "iteration", "max_num_msgs": 4}
    }"#;

    fn runner() -> FileSessionJobRunner {
        let registry = Arc::new(default_registry(&FileConfig::default()));
        let use_case = RunSessionUseCase::new(registry, Arc::new(JsonSessionStore::new()));
        FileSessionJobRunner::new(use_case, RunParams::default())
    }

    #[tokio::test]
    async fn test_batch_runs_and_skips() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("question_0");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("config_0.json"), SESSION).unwrap();
        std::fs::write(dir.join("out_fake_v1_0.json"), "{}").unwrap();

        let versions = vec!["v0".to_string(), "v1".to_string()];
        let jobs = crate::batch::discover_jobs(root.path(), 1, &versions, "fake").unwrap();
        let report = RunBatchUseCase::new(Arc::new(runner())).execute(jobs).await;

        assert_eq!(report.completed.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.is_success());

        let written = std::fs::read_to_string(dir.join("out_fake_v0_0.json")).unwrap();
        let output: SessionOutput = serde_json::from_str(&written).unwrap();
        let answers: Vec<&str> = output.chat_entry.iter().map(|e| e.answer()).collect();
        assert_eq!(answers, vec!["Ja", "Answer 1 from Ben", "Vielleicht", "Answer 2 from Ben"]);
        // surveys at 0 and 4 messages, two answers each
        assert_eq!(output.survey_question.len(), 4);
    }

    #[tokio::test]
    async fn test_missing_config_fails_job() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("empty")).unwrap();

        let jobs = crate::batch::discover_jobs(root.path(), 1, &["v0".to_string()], "fake").unwrap();
        let report = RunBatchUseCase::new(Arc::new(runner())).execute(jobs).await;

        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].1.contains("config_0.json"));
    }

    #[test]
    fn test_empty_output_is_not_complete() {
        let dir = tempfile::tempdir().unwrap();
        let job = SessionJob {
            config_path: dir.path().join("config_0.json"),
            output_path: dir.path().join("out_fake_v0_0.json"),
            prompt_version: "v0".to_string(),
            repetition: 0,
        };
        let runner = runner();
        assert!(!runner.is_complete(&job));
        std::fs::write(&job.output_path, "").unwrap();
        assert!(!runner.is_complete(&job));
        std::fs::write(&job.output_path, "{}").unwrap();
        assert!(runner.is_complete(&job));
    }
}
