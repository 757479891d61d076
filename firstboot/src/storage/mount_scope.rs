//! Scoped read-only mount of a single block device.
//!
//! The mount point is a fresh directory under a base directory. Dropping the
//! scope unmounts the device (best-effort) and removes the directory, whether
//! or not the mount ever succeeded.

use std::fs::{self, DirBuilder};
use std::io;
use std::os::unix::fs::DirBuilderExt;
use std::path::{Path, PathBuf};

use firstboot_shared::constants::ovf::MOUNT_PREFIX;
use nix::errno::Errno;
use nix::mount::{MntFlags, MsFlags, mount, umount2};
use uuid::Uuid;

use super::FilesystemType;
use crate::providers::error::DeviceError;

/// An exclusively owned, read-only mount.
///
/// Cleanup runs on drop, so every exit path (early return, `?`, unwinding)
/// leaves neither a mount nor a mount point directory behind.
#[derive(Debug)]
pub struct MountScope {
    device: PathBuf,
    mount_point: PathBuf,
    mounted: bool,
}

impl MountScope {
    /// Mount `device` read-only at a new directory under `base_dir`.
    ///
    /// # Errors
    /// * `DeviceError::MountPoint` - the mount point could not be created
    /// * `DeviceError::Mount` - mount(2) failed; the mount point is already removed
    pub fn acquire(
        device: &Path,
        fs_type: &FilesystemType,
        base_dir: &Path,
    ) -> Result<Self, DeviceError> {
        let mount_point =
            create_mount_point(base_dir).map_err(|source| DeviceError::MountPoint {
                base_dir: base_dir.to_path_buf(),
                source,
            })?;

        // Owned from here on: a failed mount below still removes the directory.
        let mut scope = MountScope {
            device: device.to_path_buf(),
            mount_point,
            mounted: false,
        };

        tracing::debug!(
            device = %device.display(),
            mount_point = %scope.mount_point.display(),
            fs_type = %fs_type,
            "Mounting config device"
        );

        mount(
            Some(device),
            scope.mount_point.as_path(),
            Some(fs_type.as_str()),
            MsFlags::MS_RDONLY,
            None::<&str>,
        )
        .map_err(|errno| DeviceError::Mount {
            device: device.to_path_buf(),
            mount_point: scope.mount_point.clone(),
            source: io::Error::from(errno),
        })?;
        scope.mounted = true;

        tracing::info!(
            "Mounted config device: {} → {}",
            device.display(),
            scope.mount_point.display()
        );
        Ok(scope)
    }

    pub fn mount_point(&self) -> &Path {
        &self.mount_point
    }

    /// Unmount and remove the mount point now rather than at end of scope.
    pub fn release(self) {
        drop(self)
    }

    fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;

        if !is_mount_point(&self.mount_point) {
            tracing::debug!(
                mount_point = %self.mount_point.display(),
                "Mount point no longer mounted, skipping unmount"
            );
            return;
        }

        match umount2(self.mount_point.as_path(), MntFlags::empty()) {
            Ok(()) => tracing::debug!(
                "Unmounted config device: {} at {}",
                self.device.display(),
                self.mount_point.display()
            ),
            // Not a mount point: nothing to undo.
            Err(Errno::EINVAL) => tracing::debug!(
                mount_point = %self.mount_point.display(),
                "umount reported not mounted"
            ),
            Err(e) => tracing::warn!(
                "Failed to unmount {} at {}: {}",
                self.device.display(),
                self.mount_point.display(),
                e
            ),
        }
    }

    fn remove_mount_point(&self) {
        // Plain rmdir: if the unmount failed this refuses to touch the
        // still-mounted volume instead of recursing into it.
        match fs::remove_dir(&self.mount_point) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                "Failed to remove mount point {}: {}",
                self.mount_point.display(),
                e
            ),
        }
    }
}

impl Drop for MountScope {
    fn drop(&mut self) {
        self.unmount();
        self.remove_mount_point();
    }
}

/// Create a uniquely named, owner-only directory under `base_dir`.
///
/// `create` (not `create_all`) fails on a name collision instead of reusing
/// someone else's directory.
fn create_mount_point(base_dir: &Path) -> io::Result<PathBuf> {
    let base = fs::canonicalize(base_dir)?;
    let path = base.join(format!("{}-{}", MOUNT_PREFIX, Uuid::new_v4().simple()));
    DirBuilder::new().mode(0o700).create(&path)?;
    Ok(path)
}

/// Whether `path` is currently listed in this process's mount table.
///
/// If the table cannot be read, assume it is mounted and let umount decide.
fn is_mount_point(path: &Path) -> bool {
    match procfs::process::Process::myself().and_then(|p| p.mountinfo()) {
        Ok(mounts) => mounts.into_iter().any(|m| m.mount_point.as_path() == path),
        Err(e) => {
            tracing::debug!("Could not read mountinfo: {}", e);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entries(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect()
    }

    #[test]
    fn test_failed_mount_removes_mount_point() {
        let base = TempDir::new().unwrap();

        let err = MountScope::acquire(
            Path::new("/nonexistent/firstboot-sr0"),
            &FilesystemType::UDF,
            base.path(),
        )
        .unwrap_err();

        match &err {
            DeviceError::Mount {
                device,
                mount_point,
                ..
            } => {
                assert_eq!(device, Path::new("/nonexistent/firstboot-sr0"));
                assert!(mount_point.starts_with(fs::canonicalize(base.path()).unwrap()));
                assert!(!mount_point.exists());
            }
            other => panic!("expected mount error, got {other:?}"),
        }
        assert!(entries(base.path()).is_empty());
    }

    #[test]
    fn test_release_after_successful_mount() {
        if unsafe { libc::geteuid() } != 0 {
            eprintln!("skipping: mounting requires root");
            return;
        }

        let base = TempDir::new().unwrap();
        let tmpfs: FilesystemType = "tmpfs".parse().unwrap();

        let scope = MountScope::acquire(Path::new("tmpfs"), &tmpfs, base.path()).unwrap();
        let mount_point = scope.mount_point().to_path_buf();
        assert!(is_mount_point(&mount_point));

        // Mounted read-only.
        let err = fs::write(mount_point.join("scratch"), b"x").unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::EROFS));

        scope.release();

        assert!(!is_mount_point(&mount_point));
        assert!(!mount_point.exists());
        assert!(entries(base.path()).is_empty());
    }

    #[test]
    fn test_drop_after_successful_mount_cleans_up() {
        if unsafe { libc::geteuid() } != 0 {
            eprintln!("skipping: mounting requires root");
            return;
        }

        let base = TempDir::new().unwrap();
        let tmpfs: FilesystemType = "tmpfs".parse().unwrap();

        let mount_point = {
            let scope = MountScope::acquire(Path::new("tmpfs"), &tmpfs, base.path()).unwrap();
            scope.mount_point().to_path_buf()
        };

        assert!(!is_mount_point(&mount_point));
        assert!(entries(base.path()).is_empty());
    }

    #[test]
    fn test_missing_base_dir_is_mount_point_error() {
        let base = TempDir::new().unwrap();
        let missing = base.path().join("missing");

        let err = MountScope::acquire(Path::new("/dev/sr0"), &FilesystemType::UDF, &missing)
            .unwrap_err();
        assert!(matches!(err, DeviceError::MountPoint { .. }));
    }

    #[test]
    fn test_drop_without_mount_removes_directory() {
        let base = TempDir::new().unwrap();
        let mount_point = create_mount_point(base.path()).unwrap();
        assert!(mount_point.is_dir());

        let scope = MountScope {
            device: PathBuf::from("/dev/sr0"),
            mount_point: mount_point.clone(),
            mounted: false,
        };
        scope.release();

        assert!(!mount_point.exists());
    }

    #[test]
    fn test_unmount_skips_path_that_is_not_mounted() {
        let base = TempDir::new().unwrap();
        let mount_point = create_mount_point(base.path()).unwrap();

        // Claims to be mounted but is absent from the mount table.
        let scope = MountScope {
            device: PathBuf::from("/dev/sr0"),
            mount_point: mount_point.clone(),
            mounted: true,
        };
        drop(scope);

        assert!(!mount_point.exists());
    }

    #[test]
    fn test_mount_points_are_unique() {
        let base = TempDir::new().unwrap();
        let first = create_mount_point(base.path()).unwrap();
        let second = create_mount_point(base.path()).unwrap();

        assert_ne!(first, second);
        let name = first.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("firstboot-ovf-"));
        assert_eq!(entries(base.path()).len(), 2);
    }

    #[test]
    fn test_temp_dir_root_is_not_a_mount_point_of_ours() {
        let base = TempDir::new().unwrap();
        let mount_point = create_mount_point(base.path()).unwrap();
        assert!(!is_mount_point(&mount_point));
    }
}
