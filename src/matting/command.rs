use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::config::{MattingConfig, INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER};
use crate::error::{MattingError, Result};
use crate::matting::Matter;

/// [`Matter`] that runs an external background-removal command per image
///
/// The command writes its result to a scratch PNG, which is read back and
/// returned.
#[derive(Debug, Clone, Default)]
pub struct CommandMatter {
    config: MattingConfig,
}

impl CommandMatter {
    pub fn new(config: MattingConfig) -> Self {
        Self { config }
    }

    /// Arguments with the placeholders substituted
    pub fn build_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let input = input.display().to_string();
        let output = output.display().to_string();

        self.config
            .args
            .iter()
            .map(|arg| {
                arg.replace(INPUT_PLACEHOLDER, &input)
                    .replace(OUTPUT_PLACEHOLDER, &output)
            })
            .collect()
    }
}

#[async_trait]
impl Matter for CommandMatter {
    async fn matte(&self, image: &Path) -> Result<Vec<u8>> {
        let failed = |reason: String| MattingError::ModelFailed {
            path: image.to_path_buf(),
            reason,
        };

        let scratch = tempfile::Builder::new()
            .prefix("human-cutout-")
            .tempdir()?;
        let output = scratch.path().join("cutout.png");
        let args = self.build_args(image, &output);

        debug!("Running: {} {}", self.config.program, args.join(" "));

        let result = Command::new(&self.config.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| failed(format!("could not run {}: {}", self.config.program, e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(failed(format!(
                "{} exited with {}: {}",
                self.config.program,
                result.status,
                stderr.trim()
            )).into());
        }

        let bytes = tokio::fs::read(&output)
            .await
            .map_err(|e| failed(format!("no output written: {}", e)))?;

        if bytes.is_empty() {
            return Err(failed("empty output".to_string()).into());
        }

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CutoutError;

    #[test]
    fn test_placeholder_substitution() {
        let matter = CommandMatter::new(MattingConfig {
            program: "backgroundremover".to_string(),
            args: vec![
                "-i".to_string(),
                "{input}".to_string(),
                "--out={output}".to_string(),
            ],
        });

        let args = matter.build_args(Path::new("/in/a b.jpg"), Path::new("/tmp/x/cutout.png"));
        assert_eq!(args, vec!["-i", "/in/a b.jpg", "--out=/tmp/x/cutout.png"]);
    }

    #[test]
    fn test_default_command() {
        let matter = CommandMatter::default();
        let args = matter.build_args(Path::new("in.png"), Path::new("out.png"));
        assert_eq!(args, vec!["i", "in.png", "out.png"]);
    }

    #[tokio::test]
    async fn test_missing_program_is_model_failure() {
        let matter = CommandMatter::new(MattingConfig {
            program: "human-cutout-no-such-model".to_string(),
            ..MattingConfig::default()
        });

        let result = matter.matte(Path::new("in.png")).await;
        assert!(matches!(
            result,
            Err(CutoutError::Matting(MattingError::ModelFailed { .. }))
        ));
    }
}
