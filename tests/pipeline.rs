use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use termcolor::Buffer;
use videovert::Error;
use videovert::batch::{Encoder, Outcome, ProcessEncoder};
use videovert::cli;
use videovert::command::Command;
use videovert::config::Config;
use videovert::covers::{CoverSource, NoCovers, Picture, PictureReader, TempCovers};
use videovert::out::Out;

/// Records when each invocation starts and ends.
#[derive(Default)]
struct Recorder {
    events: Vec<String>,
    fail: Vec<usize>,
}

impl Encoder for Recorder {
    fn encode(&mut self, command: &Command) -> Result<()> {
        let audio = command
            .args()
            .nth(6)
            .map(|a| a.to_string_lossy().into_owned())
            .unwrap_or_default();

        let n = self.events.len() / 2 + 1;
        self.events.push(format!("start {audio}"));
        self.events.push(format!("end {audio}"));

        if self.fail.contains(&n) {
            bail!("exit status: 1");
        }

        Ok(())
    }
}

/// Hands out a fixed picture for files whose name contains `tagged`.
struct Tagged;

impl PictureReader for Tagged {
    fn read(&self, audio: &Path) -> Result<Option<Picture>> {
        let name = audio.file_name().unwrap_or_default().to_string_lossy();

        if name.contains("tagged") {
            return Ok(Some(Picture {
                ext: "jpg".to_owned(),
                data: b"jpeg".to_vec(),
            }));
        }

        Ok(None)
    }
}

fn album(names: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();

    for name in names {
        fs::write(dir.path().join(name), b"").unwrap();
    }

    dir
}

fn tokens(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|s| s.to_string()).collect()
}

fn run(
    args: &[String],
    input: &str,
    covers: &mut dyn CoverSource,
    encoder: &mut Recorder,
) -> (Result<Option<Outcome>>, String) {
    run_with("ffmpeg", args, input, covers, encoder)
}

fn run_with(
    program: &str,
    args: &[String],
    input: &str,
    covers: &mut dyn CoverSource,
    encoder: &mut dyn Encoder,
) -> (Result<Option<Outcome>>, String) {
    let config = Config {
        encoder: PathBuf::from(program),
        cover_dir: std::env::temp_dir(),
    };

    let mut buf = Buffer::no_color();
    let result = cli::run(
        &mut Out::new(&mut buf),
        args,
        &config,
        covers,
        &mut input.as_bytes(),
        encoder,
    );
    (result, String::from_utf8(buf.into_inner()).unwrap())
}

#[test]
fn directory_runs_sequentially() {
    let dir = album(&["b.mp3", "a.wav", "c.txt"]);
    let audio = dir.path().to_string_lossy().into_owned();
    let mut encoder = Recorder::default();

    let (result, s) = run(
        &tokens(&["-i", "cover.png", "-a", audio.as_str(), "-y"]),
        "",
        &mut NoCovers,
        &mut encoder,
    );

    assert_eq!(
        result.unwrap(),
        Some(Outcome::Done {
            succeeded: 2,
            failed: 0
        })
    );

    let a = dir.path().join("a.wav").display().to_string();
    let b = dir.path().join("b.mp3").display().to_string();

    assert_eq!(
        encoder.events,
        vec![
            format!("start {a}"),
            format!("end {a}"),
            format!("start {b}"),
            format!("end {b}"),
        ]
    );

    assert!(s.contains("Regex filter is: "));
    assert!(s.contains("2 total commands to execute:"));
    assert!(!s.contains("Continue?"));
}

#[test]
fn partial_failure_completes_batch() {
    let dir = album(&["1.flac", "2.flac", "3.flac"]);
    let audio = dir.path().to_string_lossy().into_owned();
    let mut encoder = Recorder {
        fail: vec![2],
        ..Recorder::default()
    };

    let (result, s) = run(
        &tokens(&["-cover", "cover.png", "-audio", audio.as_str()]),
        "y\n",
        &mut NoCovers,
        &mut encoder,
    );

    assert_eq!(
        result.unwrap(),
        Some(Outcome::Done {
            succeeded: 2,
            failed: 1
        })
    );
    assert_eq!(encoder.events.len(), 6);
    assert!(s.contains("Continue? (Y/N): "));
    assert!(s.contains("Finished: 2 succeeded, 1 failed"));
}

#[cfg(unix)]
#[test]
fn failing_encoder_process_is_reported() {
    let dir = album(&["1.flac", "2.flac"]);
    let audio = dir.path().to_string_lossy().into_owned();

    let (result, s) = run_with(
        "false",
        &tokens(&["-i", "cover.png", "-a", audio.as_str(), "-y"]),
        "",
        &mut NoCovers,
        &mut ProcessEncoder,
    );

    assert_eq!(
        result.unwrap(),
        Some(Outcome::Done {
            succeeded: 0,
            failed: 2
        })
    );
    assert_eq!(s.matches("An error occurred while executing the command: ").count(), 2);
    assert!(s.contains("Finished: 0 succeeded, 2 failed"));
}

#[test]
fn declined_prompt_launches_nothing() {
    let dir = album(&["1.flac", "2.flac"]);
    let audio = dir.path().to_string_lossy().into_owned();
    let mut encoder = Recorder::default();

    let (result, _) = run(
        &tokens(&["-image", "cover.png", "-audio", audio.as_str()]),
        "no\n",
        &mut NoCovers,
        &mut encoder,
    );

    assert_eq!(result.unwrap(), Some(Outcome::Aborted));
    assert!(encoder.events.is_empty());
}

#[test]
fn directory_uses_covers_and_skips_untagged() {
    let dir = album(&["tagged-1.mp3", "plain.mp3", "tagged-2.mp3"]);
    let covers_dir = tempfile::tempdir().unwrap();
    let audio = dir.path().to_string_lossy().into_owned();
    let mut covers = TempCovers::new(covers_dir.path(), Tagged);
    let mut encoder = Recorder::default();

    let (result, s) = run(
        &tokens(&["-a", audio.as_str(), "-yes"]),
        "",
        &mut covers,
        &mut encoder,
    );

    assert_eq!(
        result.unwrap(),
        Some(Outcome::Done {
            succeeded: 2,
            failed: 0
        })
    );

    assert!(covers_dir.path().join("tagged-1.mp3.jpg").is_file());
    assert!(covers_dir.path().join("tagged-2.mp3.jpg").is_file());
    assert!(s.contains("Skipped 1 file(s) without an image"));
}

#[test]
fn filter_expression() {
    let dir = album(&["song-1.mp3", "song-2.MP3", "intro.mp3"]);
    let audio = dir.path().to_string_lossy().into_owned();
    let mut encoder = Recorder::default();

    let (result, _) = run(
        &tokens(&["-i", "c.png", "-a", audio.as_str(), "-f", "/song-.*\\.mp3/i", "-y"]),
        "",
        &mut NoCovers,
        &mut encoder,
    );

    assert_eq!(
        result.unwrap(),
        Some(Outcome::Done {
            succeeded: 2,
            failed: 0
        })
    );
}

#[test]
fn invalid_filter_aborts_before_planning() {
    let dir = album(&["1.flac"]);
    let audio = dir.path().to_string_lossy().into_owned();
    let mut encoder = Recorder::default();

    let (result, _) = run(
        &tokens(&["-i", "c.png", "-a", audio.as_str(), "-f", "/(/", "-y"]),
        "",
        &mut NoCovers,
        &mut encoder,
    );

    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::InvalidFilter { .. })
    ));
    assert!(encoder.events.is_empty());
}

#[test]
fn single_file_without_image_is_fatal() {
    let mut encoder = Recorder::default();

    let (result, _) = run(
        &tokens(&["-a", "missing/song.mp3", "-y"]),
        "",
        &mut NoCovers,
        &mut encoder,
    );

    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::MissingImage { .. })
    ));
    assert!(encoder.events.is_empty());
}

#[test]
fn usage_on_missing_arguments() {
    let mut encoder = Recorder::default();

    let (result, s) = run(&[], "", &mut NoCovers, &mut encoder);
    assert!(result.unwrap().is_none());
    assert!(s.starts_with("Too few arguments."));

    let (result, s) = run(&tokens(&["-i", "cover.png"]), "", &mut NoCovers, &mut encoder);
    assert!(result.unwrap().is_none());
    assert!(s.starts_with("No audio path provided."));
    assert!(s.contains("a2v -- Render a video with an audio file and an image."));
    assert!(encoder.events.is_empty());
}
