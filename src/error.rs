use std::path::PathBuf;

use thiserror::Error;

/// Main error type for human-cutout
#[derive(Error, Debug)]
pub enum CutoutError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Transcoder error: {0}")]
    Transcode(#[from] TranscodeError),

    #[error("Matting error: {0}")]
    Matting(#[from] MattingError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

/// Errors about the input path itself
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Input not found: {path}")]
    NotFound { path: PathBuf },

    #[error("No supported files found in: {path}")]
    NoSupportedFiles { path: PathBuf },
}

/// Errors raised by the external transcoder (ffmpeg / ffprobe)
#[derive(Error, Debug)]
pub enum TranscodeError {
    #[error("Required executable not found on PATH: {program}")]
    MissingDependency { program: String },

    #[error("{program} failed ({}): {stderr}", describe_exit(.code))]
    SubprocessFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Could not read probe output for {path}: {reason}")]
    ProbeParse { path: PathBuf, reason: String },
}

/// Errors raised by the external matting model
#[derive(Error, Debug)]
pub enum MattingError {
    #[error("Background removal failed for {path}: {reason}")]
    ModelFailed { path: PathBuf, reason: String },
}

/// Configuration and option errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {option}: {value} (valid: {valid})")]
    InvalidOption {
        option: String,
        value: String,
        valid: String,
    },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with code {}", code),
        None => "could not run".to_string(),
    }
}

/// Convenience type alias for Results using CutoutError
pub type Result<T> = std::result::Result<T, CutoutError>;

impl CutoutError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Transcode(TranscodeError::MissingDependency { program }) => {
                format!(
                    "FFmpeg is required but not found ({}). Install: brew install ffmpeg (macOS) or apt install ffmpeg (Linux)",
                    program
                )
            }
            Self::Input(InputError::NotFound { path }) => {
                format!("Input not found: {}", path.display())
            }
            Self::Config(ConfigError::InvalidOption { option, value, valid }) => {
                format!("Invalid {}: {}. Valid values: {}", option, value, valid)
            }
            _ => self.to_string(),
        }
    }
}
