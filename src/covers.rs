//! Cover art extracted from audio tags.
//!
//! A [`CoverSource`] is consulted when no image was given for a job. Reading
//! tags is best effort: any failure is reported as a warning and treated as if
//! the file had no cover.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::out::{Out, warning};

/// Something which can produce an image path for an audio file.
pub trait CoverSource {
    /// Get the path to a cover for the given audio file, if one is available.
    fn cover(&mut self, o: &mut Out<'_>, audio: &Path) -> Result<Option<PathBuf>>;
}

/// A source which never has a cover.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCovers;

impl CoverSource for NoCovers {
    #[inline]
    fn cover(&mut self, _: &mut Out<'_>, _: &Path) -> Result<Option<PathBuf>> {
        Ok(None)
    }
}

/// A picture embedded in an audio file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    /// Extension matching the picture format, like `jpg`.
    pub ext: String,
    /// Raw picture data.
    pub data: Vec<u8>,
}

/// Reads embedded pictures out of audio files.
pub trait PictureReader {
    /// Read the preferred picture of the given file.
    fn read(&self, audio: &Path) -> Result<Option<Picture>>;
}

/// Materializes embedded pictures into a cache directory.
///
/// Pictures are stored as `<audio file name>.<ext>`. If a file with that name
/// already exists it is reused as-is.
pub struct TempCovers<R> {
    dir: PathBuf,
    reader: R,
}

impl<R> TempCovers<R> {
    /// Construct a new cover cache in the given directory.
    pub fn new(dir: impl Into<PathBuf>, reader: R) -> Self {
        Self {
            dir: dir.into(),
            reader,
        }
    }
}

impl<R> CoverSource for TempCovers<R>
where
    R: PictureReader,
{
    fn cover(&mut self, o: &mut Out<'_>, audio: &Path) -> Result<Option<PathBuf>> {
        let picture = match self.reader.read(audio) {
            Ok(Some(picture)) => picture,
            Ok(None) => return Ok(None),
            Err(e) => {
                warning!(o, "{}: Could not read tags: {e}", audio.display());
                return Ok(None);
            }
        };

        let Some(name) = audio.file_name() else {
            return Ok(None);
        };

        let mut name = name.to_owned();
        name.push(".");
        name.push(&picture.ext);
        let path = self.dir.join(name);

        if path.is_file() {
            return Ok(Some(path));
        }

        if let Err(e) = fs::create_dir_all(&self.dir) {
            warning!(o, "{}: Could not create cover directory: {e}", self.dir.display());
            return Ok(None);
        }

        if let Err(e) = fs::write(&path, &picture.data) {
            warning!(o, "{}: Could not write cover: {e}", path.display());
            return Ok(None);
        }

        Ok(Some(path))
    }
}

/// Construct the default cover source.
///
/// Without the `covers` feature no tag reader is available and no covers are
/// ever found.
pub fn default_source(dir: &Path) -> Box<dyn CoverSource> {
    #[cfg(feature = "covers")]
    {
        Box::new(TempCovers::new(dir, lofty_reader::LoftyReader))
    }

    #[cfg(not(feature = "covers"))]
    {
        _ = dir;
        Box::new(NoCovers)
    }
}

#[cfg(feature = "covers")]
pub use self::lofty_reader::LoftyReader;

#[cfg(feature = "covers")]
mod lofty_reader {
    use std::path::Path;

    use anyhow::Result;
    use lofty::file::TaggedFileExt;
    use lofty::picture::{MimeType, PictureType};
    use lofty::probe::Probe;

    use super::{Picture, PictureReader};

    /// Reads pictures using [`lofty`].
    #[derive(Debug, Default, Clone, Copy)]
    pub struct LoftyReader;

    impl PictureReader for LoftyReader {
        fn read(&self, audio: &Path) -> Result<Option<Picture>> {
            let file = Probe::open(audio)?.read()?;

            let Some(tag) = file.primary_tag().or_else(|| file.first_tag()) else {
                return Ok(None);
            };

            let pictures = tag.pictures();

            let picture = pictures
                .iter()
                .find(|p| p.pic_type() == PictureType::CoverFront)
                .or_else(|| pictures.first());

            let Some(picture) = picture else {
                return Ok(None);
            };

            Ok(Some(Picture {
                ext: ext(picture.mime_type()).to_owned(),
                data: picture.data().to_vec(),
            }))
        }
    }

    fn ext(mime: Option<&MimeType>) -> &'static str {
        match mime {
            Some(MimeType::Png) => "png",
            Some(MimeType::Tiff) => "tiff",
            Some(MimeType::Bmp) => "bmp",
            Some(MimeType::Gif) => "gif",
            Some(mime) if mime.as_str() == "image/webp" => "webp",
            _ => "jpg",
        }
    }
}
