//! Persistence: session snapshots and output artifacts

mod output_writer;
mod session_store;

pub use output_writer::{OutputWriteError, output_to_json, write_output_file, write_output_json};
pub use session_store::JsonSessionStore;
