//! Session output files

use parley_domain::SessionOutput;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum OutputWriteError {
    #[error("Could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not serialize session output: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Serialize an output as JSON, indented or on one line
pub fn output_to_json(output: &SessionOutput, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(output)
    } else {
        serde_json::to_string(output)
    }
}

/// Write `content` to `path`, creating parent directories
pub fn write_output_file(path: &Path, content: &str) -> Result<(), OutputWriteError> {
    let io = |source| OutputWriteError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(io)?;
    }
    std::fs::write(path, content).map_err(io)?;
    info!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Write an output as a JSON file
pub fn write_output_json(
    output: &SessionOutput,
    path: &Path,
    pretty: bool,
) -> Result<(), OutputWriteError> {
    let json = output_to_json(output, pretty)?;
    write_output_file(path, &json)
}
