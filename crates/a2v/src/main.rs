//! Render a video from an audio file and an image.
//!
//! See [`videovert`] documentation for more information.
//!
//! [`videovert`]: https://crates.io/crates/videovert

use anyhow::Result;
use clap::Parser;

const VERSION: &str = match option_env!("VIDEOVERT_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

/// Render a video from an audio file and an image.
#[derive(Parser)]
#[command(author, version, about, max_term_width = 80, version = VERSION)]
struct Opts {
    #[command(flatten)]
    inner: videovert::cli::Videovert,
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    videovert::cli::entry(&opts.inner)
}
