//! Render a batch of audio files into still-image videos.
//!
//! Every audio file is paired with an image, either one given on the command
//! line or the cover embedded in the file's tags, and handed to `ffmpeg` which
//! loops the image for the duration of the audio.
//!
//! ```text
//! a2v -image cover.png -audio song.flac
//! a2v -audio ./album -filter "flac,mp3" -yes
//! a2v -audio ./album -filter "/^track-.*\.flac$/i"
//! ```
//!
//! When `-audio` names a directory, one video per matching file is rendered
//! into the current directory. Jobs run one at a time, and a failing job does
//! not stop the rest of the batch.

pub mod args;
pub mod batch;
pub mod cli;
pub mod command;
pub mod config;
pub mod covers;
mod error;
pub mod filter;
pub mod out;
pub mod plan;

pub use self::error::Error;
