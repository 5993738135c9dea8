use crate::easyname::is_safe_file_stem;
use crate::error::{EgressError, Result};
use crate::manifest::Manifests;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory manifests are written to when none is given.
pub const DEFAULT_OUTPUT_DIR: &str = "output_manifests";

/// Writes one `<easyname>.yaml` stream per site into a directory.
#[derive(Debug, Clone)]
pub struct ManifestWriter {
    dir: PathBuf,
}

impl ManifestWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the stream for `easyname` ends up.
    pub fn path_for(&self, easyname: &str) -> PathBuf {
        self.dir.join(format!("{easyname}.yaml"))
    }

    /// Render and write, replacing any previous file. Returns the path written.
    ///
    /// The file always lands directly inside the writer's directory.
    pub fn write(&self, manifests: &Manifests) -> Result<PathBuf> {
        if !is_safe_file_stem(&manifests.easyname) {
            return Err(EgressError::UnsafeOutputName {
                site: manifests.easyname.clone(),
                easyname: manifests.easyname.clone(),
            });
        }
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(&manifests.easyname);
        let stream = manifests.to_yaml_stream()?;
        std::fs::write(&path, stream.as_bytes())?;
        debug!(path = %path.display(), bytes = stream.len(), "Wrote manifests");
        Ok(path)
    }
}

impl Default for ManifestWriter {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DIR)
    }
}
