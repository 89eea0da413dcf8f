//! # Cutout Pipeline Module
//!
//! Sequences the per-item pipelines over everything found under the input
//! path. Items are processed one at a time, images first, and the first
//! failure stops the run.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use human_cutout::{config::{Config, ProcessOptions}, pipeline::CutoutEngine};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let engine = CutoutEngine::from_config(&Config::default());
//! let summary = engine.run("input/", "output/", ProcessOptions::default()).await?;
//! println!("Wrote {} file(s)", summary.outputs.len());
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod image;
pub mod progress;
pub mod video;

pub use engine::{CutoutEngine, RunSummary};
pub use self::image::{image_output_path, process_image, write_cutout_png};
pub use progress::{LogReporter, NoOpReporter, ProgressReporter, VideoStage};
pub use video::{process_video, video_output_path};

use std::path::Path;

/// File name without its final extension
fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
