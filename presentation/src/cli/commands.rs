//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for parley
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(author, version, about = "Simulated multi-party conversations with periodic surveys")]
#[command(long_about = r#"
Parley runs a conversation between simulated participants. A host picks who
speaks next, an end type decides when the conversation is over, and survey
questions are put to every participant while the conversation runs.

Configuration files are loaded from (in priority order):
1. PARLEY_* environment variables
2. --config <path>     Explicit config file
3. ./parley.toml       Project-level config
4. ~/.config/parley/config.toml   Global config

Example:
  parley run sessions/tempolimit.json --json --pretty-print -o out.json
  parley run sessions/tempolimit.json --save-session saved.json --max-turns 100
  parley inspect saved.json
  parley batch config/question_0 --repetitions 5 --prompt-version v0 --prompt-version v2
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one session from a session file
    Run(RunArgs),
    /// Continue a saved session until its end type fires
    Resume(ResumeArgs),
    /// Print the transcript of a saved session
    Inspect(InspectArgs),
    /// Run every session file below a directory, several times each
    Batch(BatchArgs),
}

/// Output and loop options shared by `run` and `resume`
#[derive(Args, Debug, Clone, Default)]
pub struct SessionOutputArgs {
    /// Write the session output to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Emit JSON instead of a text transcript
    #[arg(long)]
    pub json: bool,

    /// Indent JSON output
    #[arg(long)]
    pub pretty_print: bool,

    /// Prompt layout (v0, v1 or v2)
    #[arg(long, value_name = "VERSION")]
    pub prompt_version: Option<String>,

    /// Save the whole session (transcript, roster, host state) after the run
    #[arg(long, value_name = "PATH")]
    pub save_session: Option<PathBuf>,

    /// Abort if the session has not ended after this many turns
    #[arg(long, value_name = "N")]
    pub max_turns: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Session file (JSON)
    pub session: PathBuf,

    #[command(flatten)]
    pub output: SessionOutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ResumeArgs {
    /// Saved session (written by --save-session)
    pub snapshot: PathBuf,

    #[command(flatten)]
    pub output: SessionOutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Saved session (written by --save-session)
    pub snapshot: PathBuf,

    /// Print the snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Directory whose sub-directories hold config_<n>.json files
    pub root: PathBuf,

    /// Runs per session file
    #[arg(long, value_name = "N")]
    pub repetitions: Option<usize>,

    /// Prompt versions to run (repeatable)
    #[arg(long = "prompt-version", value_name = "VERSION")]
    pub prompt_versions: Vec<String>,

    /// Label used in output file names
    #[arg(long, value_name = "NAME")]
    pub llm_name: Option<String>,

    /// Sessions running at the same time
    #[arg(long, value_name = "N")]
    pub max_workers: Option<usize>,

    /// Write compact JSON output files
    #[arg(long)]
    pub compact: bool,
}
