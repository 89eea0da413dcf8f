use std::path::{Path, PathBuf};

use ::image::ImageFormat;
use tokio::task;
use tracing::debug;

use crate::error::Result;
use crate::input::MediaKind;
use crate::matting::Matter;
use crate::pipeline::file_stem;
use crate::pipeline::progress::ProgressReporter;

/// `<output_dir>/<stem>_cutout.png`, whatever the input extension
pub fn image_output_path<P: AsRef<Path>>(input: P, output_dir: &Path) -> PathBuf {
    output_dir.join(format!("{}_cutout.png", file_stem(input.as_ref())))
}

/// Run the model on `input` and store its result as an RGBA PNG at `dest`
///
/// An existing file at `dest` is overwritten.
pub async fn write_cutout_png(matter: &dyn Matter, input: &Path, dest: &Path) -> Result<()> {
    let bytes = matter.matte(input).await?;
    let dest = dest.to_path_buf();

    task::spawn_blocking(move || -> Result<()> {
        let cutout = ::image::load_from_memory(&bytes)?.to_rgba8();
        cutout.save_with_format(&dest, ImageFormat::Png)?;
        debug!("Wrote {} ({}x{})", dest.display(), cutout.width(), cutout.height());
        Ok(())
    })
    .await
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))??;

    Ok(())
}

/// Remove the background of a single image
///
/// Returns the path of the written PNG.
pub async fn process_image(
    input: &Path,
    output_dir: &Path,
    matter: &dyn Matter,
    reporter: &dyn ProgressReporter,
) -> Result<PathBuf> {
    let output = image_output_path(input, output_dir);
    reporter.item_started(input, MediaKind::Image);

    match write_cutout_png(matter, input, &output).await {
        Ok(()) => {
            reporter.item_succeeded(input, &output);
            Ok(output)
        }
        Err(e) => {
            reporter.item_failed(input, &e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CutoutError, MattingError};
    use crate::pipeline::testing::{write_png, FakeMatter, RecordingReporter};
    use tempfile::tempdir;

    #[test]
    fn test_output_name_is_always_png() {
        let out = Path::new("/out");
        assert_eq!(image_output_path("/in/photo.jpg", out), Path::new("/out/photo_cutout.png"));
        assert_eq!(image_output_path("/in/photo.PNG", out), Path::new("/out/photo_cutout.png"));
        assert_eq!(image_output_path("/in/scan.v2.tiff", out), Path::new("/out/scan.v2_cutout.png"));
    }

    #[tokio::test]
    async fn test_process_image_writes_rgba_png() {
        let input_dir = tempdir().unwrap();
        let output_dir = tempdir().unwrap();
        let input = input_dir.path().join("portrait.webp");
        write_png(&input);

        let matter = FakeMatter::default();
        let reporter = RecordingReporter::default();
        let output = process_image(&input, output_dir.path(), &matter, &reporter).await.unwrap();

        assert_eq!(output, output_dir.path().join("portrait_cutout.png"));
        let written = ::image::open(&output).unwrap();
        assert_eq!(written.color(), ::image::ColorType::Rgba8);
        assert_eq!(matter.call_count(), 1);
        assert_eq!(
            reporter.events(),
            vec!["start image portrait.webp", "done portrait_cutout.png"]
        );
    }

    #[tokio::test]
    async fn test_rerun_overwrites_output() {
        let input_dir = tempdir().unwrap();
        let output_dir = tempdir().unwrap();
        let input = input_dir.path().join("a.png");
        write_png(&input);

        let output = image_output_path(&input, output_dir.path());
        std::fs::write(&output, b"stale").unwrap();

        let matter = FakeMatter::default();
        let reporter = RecordingReporter::default();
        process_image(&input, output_dir.path(), &matter, &reporter).await.unwrap();
        process_image(&input, output_dir.path(), &matter, &reporter).await.unwrap();

        assert!(::image::open(&output).is_ok());
        assert_eq!(matter.call_count(), 2);
    }

    #[tokio::test]
    async fn test_model_failure_is_reported_and_propagated() {
        let input_dir = tempdir().unwrap();
        let output_dir = tempdir().unwrap();
        let input = input_dir.path().join("a.png");
        write_png(&input);

        let matter = FakeMatter::failing_on(1);
        let reporter = RecordingReporter::default();
        let result = process_image(&input, output_dir.path(), &matter, &reporter).await;

        assert!(matches!(
            result,
            Err(CutoutError::Matting(MattingError::ModelFailed { .. }))
        ));
        assert_eq!(reporter.events(), vec!["start image a.png", "fail a.png"]);
        assert!(!output_dir.path().join("a_cutout.png").exists());
    }

    struct GarbageMatter;

    #[async_trait::async_trait]
    impl Matter for GarbageMatter {
        async fn matte(&self, _image: &Path) -> Result<Vec<u8>> {
            Ok(b"definitely not an image".to_vec())
        }
    }

    #[tokio::test]
    async fn test_undecodable_model_output() {
        let output_dir = tempdir().unwrap();
        let dest = output_dir.path().join("x_cutout.png");

        let result = write_cutout_png(&GarbageMatter, Path::new("x.png"), &dest).await;
        assert!(matches!(result, Err(CutoutError::Image(_))));
    }
}
