use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{OutputFormat, ProcessOptions};
use crate::error::Result;
use crate::input::MediaKind;
use crate::matting::Matter;
use crate::pipeline::file_stem;
use crate::pipeline::image::write_cutout_png;
use crate::pipeline::progress::{ProgressReporter, VideoStage};
use crate::video::{FrameWorkspace, Transcoder};

/// `<output_dir>/<stem>_cutout.<webm|mov|gif>`
pub fn video_output_path<P: AsRef<Path>>(input: P, output_dir: &Path, format: OutputFormat) -> PathBuf {
    output_dir.join(format!("{}_cutout{}", file_stem(input.as_ref()), format.extension()))
}

/// Remove the background of every frame of a video
///
/// Probes the video, extracts its frames into a scratch workspace under
/// `<output_dir>/.tmp/<stem>`, mattes them one by one and encodes the result.
/// The workspace is removed whether or not any of these steps fail.
pub async fn process_video(
    input: &Path,
    output_dir: &Path,
    options: &ProcessOptions,
    transcoder: &dyn Transcoder,
    matter: &dyn Matter,
    reporter: &dyn ProgressReporter,
) -> Result<PathBuf> {
    let output = video_output_path(input, output_dir, options.format);
    reporter.item_started(input, MediaKind::Video);

    let result = match FrameWorkspace::create(output_dir, &file_stem(input)) {
        Ok(workspace) => {
            let result = run_stages(input, &output, options, &workspace, transcoder, matter, reporter).await;
            workspace.release();
            reporter.stage_completed(input, VideoStage::CleanedUp);
            result
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => {
            reporter.item_succeeded(input, &output);
            Ok(output)
        }
        Err(e) => {
            reporter.item_failed(input, &e);
            Err(e)
        }
    }
}

async fn run_stages(
    input: &Path,
    output: &Path,
    options: &ProcessOptions,
    workspace: &FrameWorkspace,
    transcoder: &dyn Transcoder,
    matter: &dyn Matter,
    reporter: &dyn ProgressReporter,
) -> Result<()> {
    let info = transcoder.probe(input).await?;
    reporter.video_probed(input, &info);
    reporter.stage_completed(input, VideoStage::Probed);

    transcoder.extract_frames(input, workspace.raw_dir()).await?;
    reporter.stage_completed(input, VideoStage::FramesExtracted);

    let frames = list_frames(workspace.raw_dir())?;
    if frames.len() as u64 != info.frame_count {
        debug!(
            "Extracted {} frames, probe estimated {}",
            frames.len(),
            info.frame_count
        );
    }

    let total = frames.len();
    for (i, frame) in frames.iter().enumerate() {
        // Same file name keeps the numbering the encoder expects
        let dest = match frame.file_name() {
            Some(name) => workspace.matted_dir().join(name),
            None => continue,
        };
        write_cutout_png(matter, frame, &dest).await?;
        reporter.frame_matted(input, i + 1, total);
    }
    reporter.stage_completed(input, VideoStage::FramesMatted);

    transcoder
        .encode_video(workspace.matted_dir(), output, info.fps, options)
        .await?;
    reporter.stage_completed(input, VideoStage::Encoded);

    Ok(())
}

/// PNG files in `dir`, sorted by name
fn list_frames(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut frames = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("png") {
            frames.push(path);
        }
    }
    frames.sort();
    Ok(frames)
}
