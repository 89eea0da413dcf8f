use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;

/// Directory under the output directory holding per-video workspaces
pub const TEMP_DIR_NAME: &str = ".tmp";

/// Scratch directories for one video's frames
///
/// Lives at `<output>/.tmp/<stem>` with `raw` and `transparent` children.
/// The whole tree is removed when the workspace is released or dropped,
/// so every exit path of the video pipeline cleans up after itself.
#[derive(Debug)]
pub struct FrameWorkspace {
    root: PathBuf,
    raw_dir: PathBuf,
    matted_dir: PathBuf,
    released: bool,
}

impl FrameWorkspace {
    /// Create the workspace for the video named `stem`
    pub fn create<P: AsRef<Path>>(output_dir: P, stem: &str) -> Result<Self> {
        let root = output_dir.as_ref().join(TEMP_DIR_NAME).join(stem);
        let raw_dir = root.join("raw");
        let matted_dir = root.join("transparent");

        // Frames left behind by an interrupted run must not leak into this one
        match std::fs::remove_dir_all(&root) {
            Ok(()) => debug!("Removed stale frame workspace at {}", root.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        // Own the directories from here on, so a failure below still cleans up
        let workspace = Self {
            root,
            raw_dir,
            matted_dir,
            released: false,
        };

        std::fs::create_dir_all(&workspace.raw_dir)?;
        std::fs::create_dir_all(&workspace.matted_dir)?;
        debug!("Created frame workspace at {}", workspace.root.display());

        Ok(workspace)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Frames as decoded from the source video
    pub fn raw_dir(&self) -> &Path {
        &self.raw_dir
    }

    /// Frames after background removal
    pub fn matted_dir(&self) -> &Path {
        &self.matted_dir
    }

    /// Remove the workspace now
    pub fn release(mut self) {
        self.cleanup();
    }

    fn cleanup(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        if let Err(e) = std::fs::remove_dir_all(&self.root) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove temporary directory {}: {}", self.root.display(), e);
            }
        }

        // Only succeeds once no other workspace is left inside
        if let Some(parent) = self.root.parent() {
            let _ = std::fs::remove_dir(parent);
        }
    }
}

impl Drop for FrameWorkspace {
    fn drop(&mut self) {
        self.cleanup();
    }
}
