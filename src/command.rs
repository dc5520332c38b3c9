use core::fmt;

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::plan::Job;

/// Keeps both frame dimensions even, which yuv420p requires.
const EVEN_CROP: &str = "crop=trunc(iw/2)*2:trunc(ih/2)*2";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Arg {
    /// Rendered as-is.
    Plain(&'static str),
    /// Rendered in double quotes.
    Quoted(OsString),
}

impl Arg {
    fn as_os_str(&self) -> &OsStr {
        match self {
            Arg::Plain(s) => OsStr::new(s),
            Arg::Quoted(s) => s,
        }
    }
}

/// A fully rendered encoder invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    program: PathBuf,
    args: Vec<Arg>,
}

impl Command {
    /// Build the invocation rendering a single job.
    ///
    /// The image is looped for as long as the audio plays, the audio stream
    /// is copied untouched and the encoder is told to overwrite the output.
    pub fn new(program: &Path, job: &Job) -> Self {
        let quoted = |path: &Path| Arg::Quoted(path.as_os_str().to_owned());

        let args = vec![
            Arg::Plain("-y"),
            Arg::Plain("-loop"),
            Arg::Plain("1"),
            Arg::Plain("-i"),
            quoted(&job.image),
            Arg::Plain("-i"),
            quoted(&job.audio),
            Arg::Plain("-c:v"),
            Arg::Plain("libx264"),
            Arg::Plain("-tune"),
            Arg::Plain("stillimage"),
            Arg::Plain("-c:a"),
            Arg::Plain("copy"),
            Arg::Plain("-pix_fmt"),
            Arg::Plain("yuv420p"),
            Arg::Plain("-vf"),
            Arg::Quoted(OsString::from(EVEN_CROP)),
            Arg::Plain("-shortest"),
            quoted(&job.output),
        ];

        Self {
            program: program.to_owned(),
            args,
        }
    }

    /// The program to run.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments passed to the program.
    pub fn args(&self) -> impl Iterator<Item = &OsStr> {
        self.args.iter().map(Arg::as_os_str)
    }

    /// Construct the process which runs this command.
    pub fn to_process(&self) -> std::process::Command {
        let mut command = std::process::Command::new(&self.program);
        command.args(self.args());
        command
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;

        for arg in &self.args {
            match arg {
                Arg::Plain(s) => write!(f, " {s}")?,
                Arg::Quoted(s) => write!(f, " \"{}\"", s.to_string_lossy())?,
            }
        }

        Ok(())
    }
}
