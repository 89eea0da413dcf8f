use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    config::{Config, ProcessOptions},
    error::{InputError, Result},
    input::classify,
    matting::{CommandMatter, Matter},
    pipeline::{
        image::process_image,
        progress::{LogReporter, ProgressReporter},
        video::process_video,
    },
    video::{FfmpegTranscoder, Transcoder},
};

/// Artifacts written by a run, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub outputs: Vec<PathBuf>,
}

/// Top-level orchestrator for a background-removal run
///
/// The engine follows a simple pipeline:
/// 1. Preflight - Check the transcoder, the input path and the output directory
/// 2. Discovery - Classify the input into images and videos
/// 3. Images - Matte each image into a PNG
/// 4. Videos - Extract, matte and re-encode each video
///
/// Everything runs sequentially and the first error ends the run.
pub struct CutoutEngine {
    transcoder: Arc<dyn Transcoder>,
    matter: Arc<dyn Matter>,
    reporter: Arc<dyn ProgressReporter>,
}

impl CutoutEngine {
    /// Create an engine over the given collaborators, reporting through `tracing`
    pub fn new(transcoder: Arc<dyn Transcoder>, matter: Arc<dyn Matter>) -> Self {
        Self {
            transcoder,
            matter,
            reporter: Arc::new(LogReporter),
        }
    }

    /// Engine backed by the real ffmpeg executables and matting command
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(FfmpegTranscoder::new(config.transcoder.clone())),
            Arc::new(CommandMatter::new(config.matting.clone())),
        )
    }

    /// Replace the progress observer
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Check prerequisites, then process everything under `input`
    ///
    /// Nothing is written unless the transcoder is available and the input
    /// exists. The output directory is created when missing.
    pub async fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output_dir: Q,
        options: ProcessOptions,
    ) -> Result<RunSummary> {
        let input = input.as_ref();
        let output_dir = output_dir.as_ref();

        self.transcoder.check_available()?;

        if !input.exists() {
            return Err(InputError::NotFound { path: input.to_path_buf() }.into());
        }

        if !output_dir.exists() {
            debug!("Creating output directory {}", output_dir.display());
            std::fs::create_dir_all(output_dir)?;
        }

        self.process_files(input, output_dir, options).await
    }

    /// Process every supported file under `input` into `output_dir`
    pub async fn process_files<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output_dir: Q,
        options: ProcessOptions,
    ) -> Result<RunSummary> {
        let input = input.as_ref();
        let output_dir = output_dir.as_ref();

        info!("🎬 Removing backgrounds ({}, {} quality)", options.format, options.quality);

        let classified = classify(input)?;
        self.reporter.files_found(classified.images.len(), classified.videos.len());

        let mut summary = RunSummary::default();

        for image in &classified.images {
            let output = process_image(image, output_dir, self.matter.as_ref(), self.reporter.as_ref()).await?;
            summary.outputs.push(output);
        }

        for video in &classified.videos {
            let output = process_video(
                video,
                output_dir,
                &options,
                self.transcoder.as_ref(),
                self.matter.as_ref(),
                self.reporter.as_ref(),
            )
            .await?;
            summary.outputs.push(output);
        }

        Ok(summary)
    }
}
