use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors raised while resolving, planning and encoding a batch.
#[derive(Debug, Error)]
pub enum Error {
    /// A required path was not given on the command line.
    #[error("No {what} path provided.")]
    MissingArgument { what: &'static str },
    /// The filter expression could not be compiled.
    #[error("Invalid filter `{filter}`: {reason}")]
    InvalidFilter { filter: String, reason: String },
    /// No image was given and none could be extracted from the audio file.
    #[error("No image provided and no embedded cover found in {}", .path.display())]
    MissingImage { path: PathBuf },
    /// The encoder exited unsuccessfully.
    #[error("{status}{}", stderr_tail(.stderr))]
    EncoderFailure { status: ExitStatus, stderr: String },
}

fn stderr_tail(stderr: &str) -> String {
    match stderr.trim_end().lines().last() {
        Some(line) if !line.trim().is_empty() => format!(": {}", line.trim()),
        _ => String::new(),
    }
}
