use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use relay_logging::relay_warn;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Client-side ceiling on upload size, enforced before any network call.
pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("only .mp4 files are accepted: {0}")]
    NotMp4(String),
    #[error("file too large: {actual} bytes (limit {max})")]
    TooLarge { actual: u64, max: u64 },
    #[error("staging directory missing or not writable: {0}")]
    StagingDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone)]
pub struct StagingSettings {
    pub dir: PathBuf,
    pub max_bytes: u64,
}

impl StagingSettings {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

/// Ensure the staging directory exists; create if missing.
fn ensure_staging_dir(dir: &Path) -> Result<(), StagingError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| StagingError::StagingDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(StagingError::StagingDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| StagingError::StagingDir(e.to_string()))?;
    }
    // Basic writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| StagingError::StagingDir(e.to_string()))?;
    Ok(())
}

/// Copies validated uploads into the staging directory under their original
/// name. A same-named staged file is replaced.
#[derive(Debug, Clone)]
pub struct VideoStager {
    settings: StagingSettings,
}

impl VideoStager {
    pub fn new(settings: StagingSettings) -> Self {
        Self { settings }
    }

    pub fn stage(&self, source: &Path) -> Result<PathBuf, StagingError> {
        let file_name = source
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| StagingError::NotMp4(source.display().to_string()))?;
        let is_mp4 = source
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("mp4"))
            .unwrap_or(false);
        if !is_mp4 {
            return Err(StagingError::NotMp4(source.display().to_string()));
        }

        let actual = fs::metadata(source)?.len();
        if actual > self.settings.max_bytes {
            return Err(StagingError::TooLarge {
                actual,
                max: self.settings.max_bytes,
            });
        }

        ensure_staging_dir(&self.settings.dir)?;
        let target = self.settings.dir.join(file_name);
        if target.exists() {
            relay_warn!("replacing staged file {}", target.display());
        }
        fs::copy(source, &target)?;
        Ok(target)
    }
}
