use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable overriding the encoder program.
pub const FFMPEG_ENV: &str = "VIDEOVERT_FFMPEG";
/// Environment variable overriding where extracted covers are stored.
pub const COVER_DIR_ENV: &str = "VIDEOVERT_COVER_DIR";

/// Settings which are not given per run on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Encoder program to invoke.
    pub encoder: PathBuf,
    /// Directory where extracted covers are written.
    pub cover_dir: PathBuf,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(env::var_os(FFMPEG_ENV), env::var_os(COVER_DIR_ENV))
    }

    fn from_vars(encoder: Option<OsString>, cover_dir: Option<OsString>) -> Self {
        let non_empty = |value: Option<OsString>| value.filter(|v| !v.is_empty()).map(PathBuf::from);

        let defaults = Self::default();

        Self {
            encoder: non_empty(encoder).unwrap_or(defaults.encoder),
            cover_dir: non_empty(cover_dir).unwrap_or(defaults.cover_dir),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            encoder: PathBuf::from("ffmpeg"),
            cover_dir: env::temp_dir().join("videovert-covers"),
        }
    }
}
