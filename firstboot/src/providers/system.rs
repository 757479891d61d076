//! Locally staged fragments.
//!
//! The image (or an operator) may stage `base.ign` and `user.ign` in the
//! system config directory. A missing file means "no fragment", never an error.

use std::fs;
use std::io;
use std::path::Path;

use firstboot_shared::SystemConfigLayout;
use firstboot_shared::errors::{FirstbootError, FirstbootResult};

/// Read `filename` from `dir`.
///
/// # Returns
/// * `Ok(Some(raw))` - the file exists (possibly empty)
/// * `Ok(None)` - the file does not exist
/// * `Err(FirstbootError::Fragment)` - any other read failure
pub fn read_fragment(dir: &Path, filename: &str) -> FirstbootResult<Option<Vec<u8>>> {
    read_config_file(&dir.join(filename))
}

/// Base fragment from the staged layout.
pub fn fetch_base_config(layout: &SystemConfigLayout) -> FirstbootResult<Option<Vec<u8>>> {
    read_config_file(&layout.base_config())
}

/// User fragment from the staged layout.
pub fn fetch_user_config(layout: &SystemConfigLayout) -> FirstbootResult<Option<Vec<u8>>> {
    read_config_file(&layout.user_config())
}

pub(crate) fn read_config_file(path: &Path) -> FirstbootResult<Option<Vec<u8>>> {
    tracing::info!("Reading config file {}", path.display());

    match fs::read(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::info!("No config at {}", path.display());
            Ok(None)
        }
        Err(e) => {
            tracing::error!("Couldn't read config {}: {}", path.display(), e);
            Err(FirstbootError::fragment(path, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_fragment_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_fragment(dir.path(), "user.ign").unwrap().is_none());
    }

    #[test]
    fn test_missing_directory_is_none() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(read_fragment(&missing, "base.ign").unwrap().is_none());
    }

    #[test]
    fn test_present_fragment() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("base.ign"), b"{\"base\":true}").unwrap();

        let layout = SystemConfigLayout::new(dir.path());
        let raw = fetch_base_config(&layout).unwrap();
        assert_eq!(raw.as_deref(), Some(&b"{\"base\":true}"[..]));
        assert!(fetch_user_config(&layout).unwrap().is_none());
    }

    #[test]
    fn test_empty_fragment_is_present() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("user.ign"), b"").unwrap();

        let raw = read_fragment(dir.path(), "user.ign").unwrap();
        assert_eq!(raw, Some(Vec::new()));
    }

    #[test]
    fn test_directory_in_place_of_file_is_error() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("user.ign")).unwrap();

        let err = read_fragment(dir.path(), "user.ign").unwrap_err();
        match err {
            FirstbootError::Fragment { path, .. } => {
                assert_eq!(path, dir.path().join("user.ign"));
            }
            other => panic!("expected fragment error, got {other:?}"),
        }
    }
}
