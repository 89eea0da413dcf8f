//! # human-cutout
//!
//! AI-powered background removal for images and videos.
//!
//! Images are passed to an external background-removal model and written as
//! transparent PNGs. Videos are split into frames with FFmpeg, each frame is
//! matted the same way, and the frames are re-encoded into a format that
//! keeps the alpha channel (VP9 WebM, ProRes 4444 MOV or GIF).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use human_cutout::{CutoutEngine, Config, ProcessOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let engine = CutoutEngine::from_config(&Config::default());
//! let options = ProcessOptions::parse("webm", "medium")?;
//! engine.run("input/", "output/", options).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`input`] - Classifies input files into images and videos
//! - [`video`] - FFmpeg transcoder, probe parsing and frame workspace
//! - [`matting`] - The background-removal model capability
//! - [`pipeline`] - Per-item pipelines and the top-level engine
//! - [`config`] - Run options and the optional configuration file
//!
//! ## Plugging in other tools
//!
//! The transcoder and the model are traits, so either can be replaced:
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use human_cutout::{matting::Matter, video::FfmpegTranscoder, CutoutEngine, Result};
//!
//! struct MyModel;
//!
//! #[async_trait::async_trait]
//! impl Matter for MyModel {
//!     async fn matte(&self, image: &Path) -> Result<Vec<u8>> {
//!         // Run your model and return the encoded cutout
//!         Ok(std::fs::read(image)?)
//!     }
//! }
//!
//! let engine = CutoutEngine::new(Arc::new(FfmpegTranscoder::default()), Arc::new(MyModel));
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod matting;
pub mod pipeline;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    config::{Config, OutputFormat, ProcessOptions, Quality},
    error::{CutoutError, Result},
    pipeline::{CutoutEngine, RunSummary},
};
