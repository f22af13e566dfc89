//! Configuration file loading for parley
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `PARLEY_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./parley.toml` or `./.parley.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/parley/config.toml`
//! 5. Default values
//!
//! Session files (the JSON experiment descriptions) are loaded by
//! [`session_file`].

mod file_config;
mod loader;
pub mod session_file;

pub use file_config::{
    ConfigIssue, ConfigValidationError, FileBatchConfig, FileConfig, FileLoggingConfig,
    FileOpenRouterConfig, FileOutputConfig, FileSessionConfig, Severity,
};
pub use loader::ConfigLoader;
pub use session_file::{SessionFileError, load_session_config};
