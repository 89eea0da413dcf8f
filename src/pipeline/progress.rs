use std::fmt;
use std::path::Path;

use tracing::{debug, error, info};

use crate::error::CutoutError;
use crate::input::MediaKind;
use crate::video::VideoInfo;

/// Milestones of the video pipeline, in the order they are reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoStage {
    Probed,
    FramesExtracted,
    FramesMatted,
    Encoded,
    CleanedUp,
}

impl fmt::Display for VideoStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Probed => "Video probed",
            Self::FramesExtracted => "Frames extracted",
            Self::FramesMatted => "Backgrounds removed",
            Self::Encoded => "Video encoded",
            Self::CleanedUp => "Temporary files removed",
        };
        f.write_str(label)
    }
}

/// Observer for run progress
///
/// Reporting never influences control flow; every method defaults to doing
/// nothing.
pub trait ProgressReporter: Send + Sync {
    fn files_found(&self, _images: usize, _videos: usize) {}

    fn item_started(&self, _path: &Path, _kind: MediaKind) {}

    fn item_succeeded(&self, _path: &Path, _output: &Path) {}

    fn item_failed(&self, _path: &Path, _error: &CutoutError) {}

    fn video_probed(&self, _path: &Path, _info: &VideoInfo) {}

    fn stage_completed(&self, _path: &Path, _stage: VideoStage) {}

    /// Called after each frame, `done` counting from 1
    fn frame_matted(&self, _path: &Path, _done: usize, _total: usize) {}
}

/// Discards all progress
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpReporter;

impl ProgressReporter for NoOpReporter {}

/// Renders progress through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn files_found(&self, images: usize, videos: usize) {
        info!("📁 Found: {} image(s), {} video(s)", images, videos);
    }

    fn item_started(&self, path: &Path, kind: MediaKind) {
        match kind {
            MediaKind::Image => info!("Processing: {}", file_name(path)),
            MediaKind::Video => info!("📹 Processing: {}", file_name(path)),
        }
    }

    fn item_succeeded(&self, _path: &Path, output: &Path) {
        info!("   ✅ Done: {}", file_name(output));
    }

    fn item_failed(&self, path: &Path, error: &CutoutError) {
        error!("   ❌ Failed: {} ({})", file_name(path), error);
    }

    fn video_probed(&self, _path: &Path, info: &VideoInfo) {
        info!(
            "   {}x{}, {:.2}fps, {} frames",
            info.width, info.height, info.fps, info.frame_count
        );
    }

    fn stage_completed(&self, _path: &Path, stage: VideoStage) {
        if stage != VideoStage::Probed {
            info!("   {}", stage);
        }
    }

    fn frame_matted(&self, _path: &Path, done: usize, total: usize) {
        if is_milestone(done, total) {
            info!("   Removing backgrounds ({}/{})", done, total);
        } else {
            debug!("   Removing backgrounds ({}/{})", done, total);
        }
    }
}

/// Steps of the per-frame progress shown at info level
const FRAME_PROGRESS_STEPS: usize = 10;

/// True for the first frame reaching each tenth of `total`, and for the last frame
fn is_milestone(done: usize, total: usize) -> bool {
    if total == 0 || done >= total {
        return true;
    }
    done * FRAME_PROGRESS_STEPS / total != (done - 1) * FRAME_PROGRESS_STEPS / total
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
