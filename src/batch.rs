use std::io::BufRead;
use std::process::Stdio;

use anyhow::{Context, Result};

use crate::command::Command;
use crate::error::Error;
use crate::out::{Out, blank, error, info};

/// Runs a single encoder invocation to completion.
pub trait Encoder {
    /// Run the command, returning once the encoder has exited.
    fn encode(&mut self, command: &Command) -> Result<()>;
}

/// Encoder which spawns the command as a child process.
///
/// The child's output is captured, and the last line of its standard error is
/// included in the failure if it exits unsuccessfully.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEncoder;

impl Encoder for ProcessEncoder {
    fn encode(&mut self, command: &Command) -> Result<()> {
        let output = command
            .to_process()
            .stdin(Stdio::null())
            .output()
            .with_context(|| command.program().display().to_string())?;

        if !output.status.success() {
            return Err(Error::EncoderFailure {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// How a batch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The confirmation was declined and nothing ran.
    Aborted,
    /// Every command ran.
    Done { succeeded: usize, failed: usize },
}

/// Ask for confirmation, reading a single line of input.
///
/// Anything but an answer starting with `y` declines, including end of input.
pub fn confirm(o: &mut Out<'_>, input: &mut dyn BufRead) -> Result<bool> {
    o.prompt(format_args!("Continue? (Y/N): "))?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_start().to_lowercase().starts_with('y'))
}

/// Run commands strictly one after another.
///
/// Unless `yes` is set, the batch is confirmed through `input` first. A
/// failing command is reported and the batch continues with the next one.
pub fn run(
    o: &mut Out<'_>,
    commands: &[Command],
    yes: bool,
    input: &mut dyn BufRead,
    encoder: &mut dyn Encoder,
) -> Result<Outcome> {
    if !yes && !confirm(o, input)? {
        return Ok(Outcome::Aborted);
    }

    let mut succeeded = 0;
    let mut failed = 0;

    for (n, command) in commands.iter().enumerate() {
        info!(o, "[{}/{}] {}", n + 1, commands.len(), command);

        match encoder.encode(command) {
            Ok(()) => {
                succeeded += 1;
            }
            Err(e) => {
                failed += 1;
                error!(o, "An error occurred while executing the command: {e:#}");
            }
        }

        blank!(o, "Done!");
    }

    Ok(Outcome::Done { succeeded, failed })
}
