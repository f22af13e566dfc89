//! Batch execution over a directory of session files

mod discovery;
mod runner;

pub use discovery::{config_path, discover_jobs, output_path};
pub use runner::FileSessionJobRunner;
