//! OS directory resolution for the config file and logs.

use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// The OS did not provide a configuration directory.
    #[error("could not determine OS configuration directory")]
    NoConfigDir,
    #[error("platform I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Where `config.ron` and log files live.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformDirs {
    pub config_dir: PathBuf,
    pub log_dir: PathBuf,
}

const APP_NAME: &str = "orrery";

impl PlatformDirs {
    /// Resolve under the OS config directory (XDG on Linux, Known Folders on
    /// Windows, Library on macOS) without touching the disk.
    pub fn resolve() -> Result<Self, PlatformError> {
        let base = dirs::config_dir().ok_or(PlatformError::NoConfigDir)?;
        Ok(Self::with_config_dir(base.join(APP_NAME)))
    }

    /// Use an explicit config directory, with logs beneath it.
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        Self {
            log_dir: config_dir.join("logs"),
            config_dir,
        }
    }

    /// `--config` when given, the OS location otherwise.
    pub fn from_override(config_dir: Option<&Path>) -> Result<Self, PlatformError> {
        match config_dir {
            Some(dir) => Ok(Self::with_config_dir(dir)),
            None => Self::resolve(),
        }
    }

    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_absolute_and_named() {
        let Ok(dirs) = PlatformDirs::resolve() else {
            return;
        };
        assert!(dirs.config_dir.is_absolute());
        assert!(dirs.config_dir.ends_with(APP_NAME));
        assert!(dirs.log_dir.starts_with(&dirs.config_dir));
    }

    #[test]
    fn test_override_wins() {
        let dirs = PlatformDirs::from_override(Some(Path::new("/tmp/orrery-cfg"))).unwrap();
        assert_eq!(dirs.config_dir, PathBuf::from("/tmp/orrery-cfg"));
        assert_eq!(dirs.log_dir, PathBuf::from("/tmp/orrery-cfg").join("logs"));
    }

    #[test]
    fn test_create_dirs() {
        let root = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::with_config_dir(root.path().join("nested").join("orrery"));
        dirs.create_dirs().unwrap();
        assert!(dirs.config_dir.is_dir());
        assert!(dirs.log_dir.is_dir());
    }
}
