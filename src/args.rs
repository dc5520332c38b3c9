//! Resolution of the single-dash flags accepted by `a2v`.
//!
//! Flags are matched case-insensitively against their canonical name or one of
//! their aliases. A flag which takes a value consumes the following token,
//! unless that token is missing or itself starts with `-`, in which case the
//! flag is recorded as [`Value::Empty`].

use std::path::PathBuf;

use crate::error::Error;
use crate::out::{Out, blank};

/// Filter used in directory mode when none is given.
pub const DEFAULT_FILTER: &str = "flac,wav,mp3,aac,opus,ogg,pcm,m4a,aiff";

const FLAG_PREFIX: char = '-';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Image,
    Audio,
    Output,
    Filter,
    Yes,
}

struct Flag {
    option: &'static str,
    aliases: &'static [&'static str],
    description: &'static str,
    display_args: &'static str,
    takes_value: bool,
    key: Key,
}

impl Flag {
    fn matches(&self, arg: &str) -> bool {
        self.option == arg || self.aliases.iter().any(|alias| *alias == arg)
    }
}

static FLAGS: &[Flag] = &[
    Flag {
        option: "-image",
        aliases: &["-i", "-cover"],
        description: "Set an image for the video(s). If not specified, the cover embedded in each audio file is used.",
        display_args: "[path]",
        takes_value: true,
        key: Key::Image,
    },
    Flag {
        option: "-audio",
        aliases: &["-a"],
        description: "Set an audio for the video. If a directory is specified, multiple videos will be rendered.",
        display_args: "[path]",
        takes_value: true,
        key: Key::Audio,
    },
    Flag {
        option: "-output",
        aliases: &["-out", "-o", "-v", "-video", "-r"],
        description: "Set an output path for the video. If not specified, video(s) will be rendered to the current directory with the original filename in .mp4 format.",
        display_args: "[path] (Optional)",
        takes_value: true,
        key: Key::Output,
    },
    Flag {
        option: "-filter",
        aliases: &["-ext", "-f"],
        description: "Set a filter to only detect audio with a regex or extensions when rendering from a directory. Can be a list of extensions (for example \"wav,mp3,flac,aac\") or a regex (for example \"/song-.*\\.mp3/i\"). Defaults to \"flac,wav,mp3,aac,opus,ogg,pcm,m4a,aiff\".",
        display_args: "[filter] (Optional)",
        takes_value: true,
        key: Key::Filter,
    },
    Flag {
        option: "-yes",
        aliases: &["-y"],
        description: "Skip any prompts.",
        display_args: "",
        takes_value: false,
        key: Key::Yes,
    },
];

/// The value recorded for a flag which takes one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// The flag was given without a usable value.
    Empty,
    /// The flag was given with a value.
    Set(String),
}

impl Value {
    /// Get the value if one was set and it is non-empty.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Set(s) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Flags as they were found on the command line.
///
/// A field is `None` when the flag was never given.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Args {
    pub image: Option<Value>,
    pub audio: Option<Value>,
    pub output: Option<Value>,
    pub filter: Option<Value>,
    pub yes: bool,
}

impl Args {
    /// Scan the given tokens for recognized flags.
    ///
    /// Unrecognized tokens are ignored. If a flag is given more than once the
    /// last occurrence wins.
    pub fn parse<S>(tokens: &[S]) -> Self
    where
        S: AsRef<str>,
    {
        let mut args = Args::default();
        let mut index = 0;

        while let Some(token) = tokens.get(index) {
            index += 1;

            let token = AsRef::<str>::as_ref(token).to_lowercase();

            let Some(flag) = FLAGS.iter().find(|flag| flag.matches(&token)) else {
                continue;
            };

            let slot = match flag.key {
                Key::Image => &mut args.image,
                Key::Audio => &mut args.audio,
                Key::Output => &mut args.output,
                Key::Filter => &mut args.filter,
                Key::Yes => {
                    args.yes = true;
                    continue;
                }
            };

            let next = tokens.get(index).map(AsRef::<str>::as_ref);

            let value = match next {
                Some(next) if !next.starts_with(FLAG_PREFIX) => {
                    index += 1;
                    Value::Set(next.to_owned())
                }
                _ => Value::Empty,
            };

            *slot = Some(value);
        }

        args
    }

    /// Resolve parsed flags into options, defaulting the filter.
    pub fn resolve(self) -> Result<Options, Error> {
        fn path(value: Option<Value>) -> Option<PathBuf> {
            value?.as_str().map(PathBuf::from)
        }

        let Some(audio) = path(self.audio) else {
            return Err(Error::MissingArgument { what: "audio" });
        };

        let filter = self
            .filter
            .as_ref()
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_FILTER)
            .to_owned();

        Ok(Options {
            image: path(self.image),
            audio,
            output: path(self.output),
            filter,
            yes: self.yes,
        })
    }
}

/// Resolved options for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Image used for every video, if given.
    pub image: Option<PathBuf>,
    /// Audio file or directory of audio files.
    pub audio: PathBuf,
    /// Output path, only used in single-file mode.
    pub output: Option<PathBuf>,
    /// Filter expression used in directory mode.
    pub filter: String,
    /// Skip the confirmation prompt.
    pub yes: bool,
}

/// Print usage, optionally prefixed by the reason it is shown.
pub fn usage(o: &mut Out<'_>, reason: Option<&str>) -> anyhow::Result<()> {
    if let Some(reason) = reason {
        blank!(o, "{reason}");
        blank!(o, "");
    }

    blank!(o, "a2v -- Render a video with an audio file and an image.");
    blank!(o, "Help:");

    let mut flags = FLAGS.iter().collect::<Vec<_>>();
    flags.sort_by_key(|flag| flag.option);

    let mut o = o.indent(1);

    for flag in flags {
        let aliases = flag.aliases.join(", ");

        if flag.takes_value {
            blank!(
                o,
                "{} ({aliases}) {} - {}",
                flag.option,
                flag.display_args,
                flag.description
            );
        } else {
            blank!(o, "{} ({aliases}) - {}", flag.option, flag.description);
        }
    }

    Ok(())
}
