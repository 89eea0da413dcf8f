use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::config::{ProcessOptions, TranscoderConfig};
use crate::error::{Result, TranscodeError};
use crate::video::codec::{encode_args, extract_args};
use crate::video::types::{parse_probe_output, VideoInfo};

/// Number of trailing stderr bytes kept in subprocess errors
const STDERR_TAIL: usize = 2048;

/// Frame extraction and encoding capability
///
/// Implemented by [`FfmpegTranscoder`] in production and by in-process
/// doubles in tests.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Fail with `MissingDependency` unless the tools can be run
    fn check_available(&self) -> Result<()>;

    /// Read stream properties of `video`
    async fn probe(&self, video: &Path) -> Result<VideoInfo>;

    /// Write every frame of `video` into `dest_dir` as `frame_000001.png`, ...
    async fn extract_frames(&self, video: &Path, dest_dir: &Path) -> Result<()>;

    /// Encode the numbered frames in `frame_dir` into `dest`
    async fn encode_video(
        &self,
        frame_dir: &Path,
        dest: &Path,
        fps: f64,
        options: &ProcessOptions,
    ) -> Result<()>;
}

/// [`Transcoder`] backed by the `ffmpeg` and `ffprobe` executables
#[derive(Debug, Clone, Default)]
pub struct FfmpegTranscoder {
    config: TranscoderConfig,
}

impl FfmpegTranscoder {
    pub fn new(config: TranscoderConfig) -> Self {
        Self { config }
    }

    async fn run(&self, program: &str, args: &[String]) -> Result<Vec<u8>> {
        debug!("Running: {} {}", program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| TranscodeError::SubprocessFailed {
                program: program.to_string(),
                code: None,
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(TranscodeError::SubprocessFailed {
                program: program.to_string(),
                code: output.status.code(),
                stderr: stderr_tail(&output.stderr),
            }.into());
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    fn check_available(&self) -> Result<()> {
        for program in [&self.config.ffmpeg, &self.config.ffprobe] {
            which::which(program).map_err(|_| TranscodeError::MissingDependency {
                program: program.clone(),
            })?;
        }
        Ok(())
    }

    async fn probe(&self, video: &Path) -> Result<VideoInfo> {
        let args = vec![
            "-v".to_string(),
            "quiet".to_string(),
            "-print_format".to_string(),
            "json".to_string(),
            "-show_streams".to_string(),
            "-show_format".to_string(),
            video.display().to_string(),
        ];
        let stdout = self.run(&self.config.ffprobe, &args).await?;
        parse_probe_output(video, &stdout)
    }

    async fn extract_frames(&self, video: &Path, dest_dir: &Path) -> Result<()> {
        self.run(&self.config.ffmpeg, &extract_args(video, dest_dir)).await?;
        Ok(())
    }

    async fn encode_video(
        &self,
        frame_dir: &Path,
        dest: &Path,
        fps: f64,
        options: &ProcessOptions,
    ) -> Result<()> {
        let args = encode_args(frame_dir, dest, fps, options);
        self.run(&self.config.ffmpeg, &args).await?;
        Ok(())
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    if text.len() <= STDERR_TAIL {
        return text.to_string();
    }

    let mut start = text.len() - STDERR_TAIL;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    format!("...{}", &text[start..])
}
