//! Application-level configuration.
//!
//! - [`SessionConfig`]: the conversation to simulate (scenario, roster, host, end type)
//! - [`RunParams`]: per-run loop control (prompt version, turn guard, survey policy)

pub mod run_params;
pub mod session_config;

pub use run_params::RunParams;
pub use session_config::{
    ConfigError, EndTypeConfig, ExperimentConfig, HostConfig, PersonSpec, SessionConfig,
};
