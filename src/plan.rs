use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ignore::WalkBuilder;

use crate::args::Options;
use crate::covers::CoverSource;
use crate::error::Error;
use crate::filter::Filter;
use crate::out::{Out, warning};

/// A single video to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub image: PathBuf,
    pub audio: PathBuf,
    pub output: PathBuf,
}

/// The jobs to render in order, and the files which were left out.
#[derive(Debug, Default)]
pub struct Plan {
    pub jobs: Vec<Job>,
    pub skipped: Vec<PathBuf>,
}

/// Replace the final extension of a file name with `.mp4`.
///
/// Names without an extension get `.mp4` appended.
pub fn to_mp4(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, _)) => format!("{stem}.mp4"),
        None => format!("{name}.mp4"),
    }
}

/// Plan the jobs for the given options.
pub fn plan(
    o: &mut Out<'_>,
    options: &Options,
    filter: &Filter,
    covers: &mut dyn CoverSource,
) -> Result<Plan> {
    if options.audio.is_dir() {
        if let Some(output) = &options.output {
            warning!(
                o,
                "{}: Output path is ignored when rendering a directory",
                output.display()
            );
        }

        plan_dir(o, options, filter, covers)
    } else {
        plan_file(o, options, covers)
    }
}

fn plan_dir(
    o: &mut Out<'_>,
    options: &Options,
    filter: &Filter,
    covers: &mut dyn CoverSource,
) -> Result<Plan> {
    let mut plan = Plan::default();

    let walker = WalkBuilder::new(&options.audio)
        .max_depth(Some(1))
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    for entry in walker {
        let entry = entry.with_context(|| options.audio.display().to_string())?;

        // Follows symlinks, so links to directories are never planned.
        if entry.depth() == 0 || entry.path().is_dir() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            warning!(o, "{}: Skipping non UTF-8 file name", entry.path().display());
            continue;
        };

        if !filter.is_match(name) {
            continue;
        }

        let audio = entry.path();

        let Some(image) = image(o, options, covers, audio)? else {
            warning!(o, "{}: Skipping, no image or embedded cover", audio.display());
            plan.skipped.push(audio.to_owned());
            continue;
        };

        plan.jobs.push(Job {
            image,
            audio: audio.to_owned(),
            output: PathBuf::from(to_mp4(name)),
        });
    }

    Ok(plan)
}

fn plan_file(o: &mut Out<'_>, options: &Options, covers: &mut dyn CoverSource) -> Result<Plan> {
    let audio = &options.audio;

    let Some(image) = image(o, options, covers, audio)? else {
        return Err(Error::MissingImage {
            path: audio.clone(),
        }
        .into());
    };

    let output = match &options.output {
        Some(output) => output.clone(),
        None => {
            let name = audio
                .file_name()
                .with_context(|| format!("{}: Missing file name", audio.display()))?;
            PathBuf::from(to_mp4(&name.to_string_lossy()))
        }
    };

    Ok(Plan {
        jobs: vec![Job {
            image,
            audio: audio.clone(),
            output,
        }],
        skipped: Vec::new(),
    })
}

fn image(
    o: &mut Out<'_>,
    options: &Options,
    covers: &mut dyn CoverSource,
    audio: &Path,
) -> Result<Option<PathBuf>> {
    if let Some(image) = &options.image {
        return Ok(Some(image.clone()));
    }

    covers.cover(o, audio)
}
