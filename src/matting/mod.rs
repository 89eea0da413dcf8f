//! # Matting Module
//!
//! The background-removal model is an external collaborator. This module
//! defines the capability the pipelines rely on and a command-line backed
//! implementation of it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use human_cutout::matting::{CommandMatter, Matter};
//! use human_cutout::config::MattingConfig;
//! use std::path::Path;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let matter = CommandMatter::new(MattingConfig::default());
//! let png_bytes = matter.matte(Path::new("portrait.jpg")).await?;
//! println!("Model returned {} bytes", png_bytes.len());
//! # Ok(())
//! # }
//! ```

pub mod command;

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

pub use command::CommandMatter;

/// Background-removal capability
#[async_trait]
pub trait Matter: Send + Sync {
    /// Returns the encoded image for `image` with its background made transparent
    async fn matte(&self, image: &Path) -> Result<Vec<u8>>;
}
