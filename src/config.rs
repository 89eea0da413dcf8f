use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ConfigError, CutoutError, Result};

/// Placeholder replaced with the source image path in matting arguments
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// Placeholder replaced with the scratch output path in matting arguments
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Container/codec family for video output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    WebM,
    Mov,
    Gif,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::WebM, OutputFormat::Mov, OutputFormat::Gif];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WebM => "webm",
            Self::Mov => "mov",
            Self::Gif => "gif",
        }
    }

    /// File extension, including the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::WebM => ".webm",
            Self::Mov => ".mov",
            Self::Gif => ".gif",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = CutoutError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| invalid_option("format", s, &Self::ALL.map(|f| f.as_str())))
    }
}

/// Output quality preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    Medium,
    High,
}

impl Quality {
    pub const ALL: [Quality; 3] = [Quality::Low, Quality::Medium, Quality::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = CutoutError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|quality| quality.as_str() == s)
            .ok_or_else(|| invalid_option("quality", s, &Self::ALL.map(|q| q.as_str())))
    }
}

fn invalid_option(option: &str, value: &str, valid: &[&str]) -> CutoutError {
    ConfigError::InvalidOption {
        option: option.to_string(),
        value: value.to_string(),
        valid: valid.join(", "),
    }
    .into()
}

/// Options for a single run, fixed for its whole duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOptions {
    pub format: OutputFormat,
    pub quality: Quality,
}

impl ProcessOptions {
    /// Parse the user-facing option strings
    pub fn parse(format: &str, quality: &str) -> Result<Self> {
        Ok(Self {
            format: format.parse()?,
            quality: quality.parse()?,
        })
    }
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::WebM,
            quality: Quality::Medium,
        }
    }
}

/// Resolve the run options, then the configuration
///
/// The option strings are parsed before the configuration file is read, so
/// an invalid `--format` or `--quality` fails without any file I/O. Without
/// a path the default configuration is used.
pub fn load_run_settings(
    format: &str,
    quality: &str,
    config_path: Option<&Path>,
) -> Result<(ProcessOptions, Config)> {
    let options = ProcessOptions::parse(format, quality)?;

    let config = match config_path {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Config::from_file(path)?
        }
        None => Config::default(),
    };
    config.validate()?;

    Ok((options, config))
}

/// Tool configuration, optionally loaded from a TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External transcoder executables
    pub transcoder: TranscoderConfig,

    /// External matting model command
    pub matting: MattingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.transcoder.validate()?;
        self.matting.validate()?;
        Ok(())
    }
}

/// Locations of the ffmpeg and ffprobe executables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscoderConfig {
    /// Program name or path for ffmpeg
    pub ffmpeg: String,

    /// Program name or path for ffprobe
    pub ffprobe: String,
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }
}

impl TranscoderConfig {
    fn validate(&self) -> Result<()> {
        for (key, value) in [("transcoder.ffmpeg", &self.ffmpeg), ("transcoder.ffprobe", &self.ffprobe)] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.clone()
                }.into());
            }
        }
        Ok(())
    }
}

/// Command line used to run the background-removal model on one image
///
/// `{input}` and `{output}` in `args` are replaced with the source image
/// and the PNG path the model must write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MattingConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for MattingConfig {
    fn default() -> Self {
        Self {
            program: "rembg".to_string(),
            args: vec![
                "i".to_string(),
                INPUT_PLACEHOLDER.to_string(),
                OUTPUT_PLACEHOLDER.to_string(),
            ],
        }
    }
}

impl MattingConfig {
    fn validate(&self) -> Result<()> {
        if self.program.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "matting.program".to_string(),
                value: self.program.clone()
            }.into());
        }

        for placeholder in [INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER] {
            if !self.args.iter().any(|arg| arg.contains(placeholder)) {
                return Err(ConfigError::InvalidValue {
                    key: "matting.args".to_string(),
                    value: format!("{:?} (missing {})", self.args, placeholder)
                }.into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("cutout.toml");

        let mut original_config = Config::default();
        original_config.transcoder.ffmpeg = "/opt/ffmpeg/bin/ffmpeg".to_string();

        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(loaded_config.transcoder.ffmpeg, "/opt/ffmpeg/bin/ffmpeg");
        assert_eq!(loaded_config.matting.args, original_config.matting.args);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("cutout.toml");
        std::fs::write(&file_path, "[matting]\nprogram = \"backgroundremover\"\n").unwrap();

        let config = Config::from_file(&file_path).unwrap();
        assert_eq!(config.matting.program, "backgroundremover");
        assert_eq!(config.matting.args, MattingConfig::default().args);
        assert_eq!(config.transcoder.ffprobe, "ffprobe");
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempdir().unwrap();
        let result = Config::from_file(dir.path().join("nope.toml"));
        assert!(matches!(
            result,
            Err(CutoutError::Config(ConfigError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_matting_args_need_placeholders() {
        let mut config = Config::default();
        config.matting.args = vec!["i".to_string(), "{input}".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_ffmpeg_is_invalid() {
        let mut config = Config::default();
        config.transcoder.ffmpeg = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_options() {
        let options = ProcessOptions::parse("gif", "high").unwrap();
        assert_eq!(options.format, OutputFormat::Gif);
        assert_eq!(options.quality, Quality::High);
        assert_eq!(ProcessOptions::default(), ProcessOptions::parse("webm", "medium").unwrap());
    }

    #[test]
    fn test_invalid_format_rejected() {
        let result = ProcessOptions::parse("avi", "medium");
        match result {
            Err(CutoutError::Config(ConfigError::InvalidOption { option, value, valid })) => {
                assert_eq!(option, "format");
                assert_eq!(value, "avi");
                assert_eq!(valid, "webm, mov, gif");
            }
            other => panic!("Expected InvalidOption error, got {:?}", other),
        }

        // Option strings are case-sensitive
        assert!(ProcessOptions::parse("WEBM", "medium").is_err());
        assert!(ProcessOptions::parse("webm", "ultra").is_err());
    }

    #[test]
    fn test_bad_option_wins_over_missing_config() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        let result = load_run_settings("avi", "medium", Some(&missing));
        assert!(matches!(
            result,
            Err(CutoutError::Config(ConfigError::InvalidOption { .. }))
        ));

        let result = load_run_settings("webm", "medium", Some(&missing));
        assert!(matches!(
            result,
            Err(CutoutError::Config(ConfigError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_run_settings_defaults() {
        let (options, config) = load_run_settings("mov", "low", None).unwrap();
        assert_eq!(options, ProcessOptions { format: OutputFormat::Mov, quality: Quality::Low });
        assert_eq!(config.matting.program, "rembg");
    }

    #[test]
    fn test_format_extensions() {
        assert_eq!(OutputFormat::WebM.extension(), ".webm");
        assert_eq!(OutputFormat::Mov.extension(), ".mov");
        assert_eq!(OutputFormat::Gif.extension(), ".gif");
    }
}
