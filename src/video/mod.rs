//! # Video Module
//!
//! Everything the video pipeline needs from the outside world: probing,
//! frame extraction and encoding through FFmpeg, plus the scratch
//! workspace holding intermediate frames.

pub mod codec;
pub mod transcoder;
pub mod types;
pub mod workspace;

pub use codec::FRAME_PATTERN;
pub use transcoder::{FfmpegTranscoder, Transcoder};
pub use types::{parse_frame_rate, parse_probe_output, VideoInfo};
pub use workspace::FrameWorkspace;
