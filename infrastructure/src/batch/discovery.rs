//! Batch job discovery
//!
//! Layout under the batch root:
//!
//! ```text
//! root/
//!   question_0_anna_ben/
//!     config_0.json   config_1.json ...
//!     out_{llm}_{version}_{repetition}.json   (written by the batch)
//! ```

use parley_application::SessionJob;
use std::path::{Path, PathBuf};

/// Output file of one run of `dir/config_{repetition}.json`
pub fn output_path(dir: &Path, llm_name: &str, prompt_version: &str, repetition: usize) -> PathBuf {
    dir.join(format!("out_{llm_name}_{prompt_version}_{repetition}.json"))
}

pub fn config_path(dir: &Path, repetition: usize) -> PathBuf {
    dir.join(format!("config_{repetition}.json"))
}

/// Every job for every sub-directory of `root`
///
/// Ordered by repetition, then directory name, then prompt version, so the
/// first repetition of everything is scheduled before the second.
pub fn discover_jobs(
    root: &Path,
    repetitions: usize,
    prompt_versions: &[String],
    llm_name: &str,
) -> std::io::Result<Vec<SessionJob>> {
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(root)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    let mut jobs = Vec::with_capacity(repetitions * dirs.len() * prompt_versions.len());
    for repetition in 0..repetitions {
        for dir in &dirs {
            for version in prompt_versions {
                jobs.push(SessionJob {
                    config_path: config_path(dir, repetition),
                    output_path: output_path(dir, llm_name, version, repetition),
                    prompt_version: version.clone(),
                    repetition,
                });
            }
        }
    }
    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_jobs() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("b")).unwrap();
        std::fs::create_dir(root.path().join("a")).unwrap();
        std::fs::write(root.path().join("notes.txt"), "not a directory").unwrap();

        let versions = vec!["v0".to_string(), "v2".to_string()];
        let jobs = discover_jobs(root.path(), 2, &versions, "mistral-7b").unwrap();

        assert_eq!(jobs.len(), 8);
        assert_eq!(jobs[0].config_path, root.path().join("a").join("config_0.json"));
        assert_eq!(
            jobs[0].output_path,
            root.path().join("a").join("out_mistral-7b_v0_0.json")
        );
        assert_eq!(jobs[1].prompt_version, "v2");
        assert_eq!(jobs[2].config_path, root.path().join("b").join("config_0.json"));
        assert_eq!(jobs[4].repetition, 1);
        assert_eq!(
            jobs[7].output_path,
            root.path().join("b").join("out_mistral-7b_v2_1.json")
        );
    }

    #[test]
    fn test_missing_root() {
        assert!(discover_jobs(Path::new("/nonexistent/batch"), 1, &[], "m").is_err());
    }
}
