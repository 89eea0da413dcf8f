use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{InputError, Result};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "tiff"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "webm", "avi", "mkv", "m4v", "ogv"];

/// Which pipeline a file belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a path by its extension (case-insensitive)
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();

        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Image)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Video)
        } else {
            None
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => f.write_str("image"),
            Self::Video => f.write_str("video"),
        }
    }
}

/// Input files partitioned by pipeline, each list in listing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedInput {
    pub images: Vec<PathBuf>,
    pub videos: Vec<PathBuf>,
}

impl ClassifiedInput {
    pub fn len(&self) -> usize {
        self.images.len() + self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.videos.is_empty()
    }

    fn push(&mut self, path: PathBuf) {
        match MediaKind::from_path(&path) {
            Some(MediaKind::Image) => self.images.push(path),
            Some(MediaKind::Video) => self.videos.push(path),
            None => debug!("Skipping unsupported file: {}", path.display()),
        }
    }
}

/// Partition an input file or directory into images and videos
///
/// A directory is listed non-recursively; only regular files are kept and
/// entries are visited in file-name order. A single file with an unknown
/// extension yields nothing, which like an empty directory is reported as
/// [`InputError::NoSupportedFiles`].
pub fn classify<P: AsRef<Path>>(input: P) -> Result<ClassifiedInput> {
    let input = input.as_ref();
    let metadata = match std::fs::metadata(input) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(InputError::NotFound { path: input.to_path_buf() }.into());
        }
        Err(e) => return Err(e.into()),
    };

    let mut classified = ClassifiedInput::default();

    if metadata.is_file() {
        classified.push(input.to_path_buf());
    } else {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(input)? {
            let path = entry?.path();
            // Follows symlinks, like the regular-file check on the input itself
            if path.is_file() {
                entries.push(path);
            }
        }
        entries.sort();

        for path in entries {
            classified.push(path);
        }
    }

    if classified.is_empty() {
        return Err(InputError::NoSupportedFiles { path: input.to_path_buf() }.into());
    }

    Ok(classified)
}
