//! Command line entry point.

use std::io::{self, BufRead};

use anyhow::Result;
use clap::Args;
use termcolor::{ColorChoice, StandardStream};

use crate::args::{self, Options};
use crate::batch::{self, Encoder, Outcome, ProcessEncoder};
use crate::command::Command;
use crate::config::Config;
use crate::covers::{self, CoverSource};
use crate::error::Error;
use crate::filter::Filter;
use crate::out::{Out, blank, info, warning};
use crate::plan;

/// Render a video from an audio file and an image.
///
/// Takes single-dash flags such as `-image`, `-audio`, `-output`, `-filter`
/// and `-yes`. Run without arguments for a full listing.
#[derive(Debug, Default, Args)]
pub struct Videovert {
    /// Flags and their values.
    #[arg(value_name = "FLAGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Entry point for `a2v`.
pub fn entry(opts: &Videovert) -> Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let mut o = Out::new(&mut stdout);
    let config = Config::from_env();
    let mut covers = covers::default_source(&config.cover_dir);
    let stdin = io::stdin();

    run(
        &mut o,
        &opts.args,
        &config,
        covers.as_mut(),
        &mut stdin.lock(),
        &mut ProcessEncoder,
    )?;

    Ok(())
}

/// Run the whole pipeline over the given tokens.
///
/// Returns `None` if usage was printed or there was nothing to render.
pub fn run(
    o: &mut Out<'_>,
    tokens: &[String],
    config: &Config,
    covers: &mut dyn CoverSource,
    input: &mut dyn BufRead,
    encoder: &mut dyn Encoder,
) -> Result<Option<Outcome>> {
    if tokens.is_empty() {
        args::usage(o, Some("Too few arguments."))?;
        return Ok(None);
    }

    let options = match args::Args::parse(tokens).resolve() {
        Ok(options) => options,
        Err(e @ Error::MissingArgument { .. }) => {
            args::usage(o, Some(&e.to_string()))?;
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let commands = commands(o, &options, config, covers)?;

    if commands.is_empty() {
        warning!(o, "{}: Nothing to render", options.audio.display());
        return Ok(None);
    }

    info!(o, "{} total commands to execute:", commands.len());

    {
        let mut o = o.indent(1);

        for command in &commands {
            blank!(o, "{command}");
        }
    }

    let outcome = batch::run(o, &commands, options.yes, input, encoder)?;

    if let Outcome::Done { succeeded, failed } = outcome {
        info!(o, "Finished: {succeeded} succeeded, {failed} failed");
    }

    Ok(Some(outcome))
}

fn commands(
    o: &mut Out<'_>,
    options: &Options,
    config: &Config,
    covers: &mut dyn CoverSource,
) -> Result<Vec<Command>> {
    let filter = Filter::new(&options.filter)?;
    info!(o, "Regex filter is: {filter}");

    let plan = plan::plan(o, options, &filter, covers)?;

    if !plan.skipped.is_empty() {
        warning!(o, "Skipped {} file(s) without an image", plan.skipped.len());
    }

    Ok(plan
        .jobs
        .iter()
        .map(|job| Command::new(&config.encoder, job))
        .collect())
}
