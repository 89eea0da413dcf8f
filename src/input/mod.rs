//! # Input Discovery Module
//!
//! Turns the user's `--input` path into the list of images and videos to
//! process. Classification is purely extension based.

pub mod classifier;

pub use classifier::{classify, ClassifiedInput, MediaKind};
