//! OVF metadata volume provider.
//!
//! The platform attaches a small filesystem-typed volume (a virtual DVD on
//! Azure) carrying `CustomData.bin`. Several candidate volumes may be present,
//! e.g. duplicate labels or stale attachments, so every candidate is tried in
//! order until one yields a payload.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use firstboot_shared::constants::ovf::CONFIG_PATH;
use firstboot_shared::errors::FirstbootResult;

use super::ConfigProvider;
use super::error::{DeviceError, FetchError};
use crate::storage::cdrom;
use crate::storage::{BlockDeviceLister, FilesystemType, MountScope};

// ============================================================================
// DEVICE CONFIG READER
// ============================================================================

/// Reads the configuration file from one candidate device.
///
/// `Ok(None)` means the device carries no configuration, which is not an error.
pub trait DeviceConfigReader {
    fn read(
        &self,
        device: &Path,
        fs_type: &FilesystemType,
    ) -> Result<Option<Vec<u8>>, DeviceError>;
}

impl<T: DeviceConfigReader + ?Sized> DeviceConfigReader for &T {
    fn read(
        &self,
        device: &Path,
        fs_type: &FilesystemType,
    ) -> Result<Option<Vec<u8>>, DeviceError> {
        (**self).read(device, fs_type)
    }
}

/// Mounts the device read-only and reads `CustomData.bin` from its root.
#[derive(Clone, Debug)]
pub struct MountingReader {
    mount_base: PathBuf,
    check_media: bool,
}

impl MountingReader {
    /// Create a reader placing temporary mount points under `mount_base`.
    pub fn new(mount_base: impl Into<PathBuf>) -> Self {
        Self {
            mount_base: mount_base.into(),
            check_media: true,
        }
    }

    /// Behaviour optical drives for a loaded disc before mounting.
    pub fn with_media_check(mut self, check_media: bool) -> Self {
        self.check_media = check_media;
        self
    }

    /// False only when the device is an optical drive without a usable disc.
    fn media_present(device: &Path) -> bool {
        match cdrom::drive_status(device) {
            Ok(status) if status.has_media() => true,
            Ok(status) => {
                tracing::info!(
                    device = %device.display(),
                    ?status,
                    "Drive has no usable media, skipping"
                );
                false
            }
            Err(e) if cdrom::is_not_optical(&e) => {
                tracing::debug!(device = %device.display(), "Not an optical drive");
                true
            }
            Err(e) => {
                // Let the mount attempt report the real problem.
                tracing::debug!(
                    device = %device.display(),
                    "Drive status unavailable: {}",
                    e
                );
                true
            }
        }
    }
}

impl DeviceConfigReader for MountingReader {
    fn read(
        &self,
        device: &Path,
        fs_type: &FilesystemType,
    ) -> Result<Option<Vec<u8>>, DeviceError> {
        if self.check_media && !Self::media_present(device) {
            return Ok(None);
        }

        let scope = MountScope::acquire(device, fs_type, &self.mount_base)?;
        let result = read_config(device, scope.mount_point());
        scope.release();
        result
    }
}

/// Read `CustomData.bin` from the root of a mounted volume.
///
/// A missing or empty file means the volume carries no configuration.
fn read_config(device: &Path, mount_point: &Path) -> Result<Option<Vec<u8>>, DeviceError> {
    let path = mount_point.join(CONFIG_PATH);

    tracing::debug!(path = %path.display(), "Reading config");
    match fs::read(&path) {
        Ok(raw) if raw.is_empty() => {
            tracing::info!(device = %device.display(), "Config file is empty");
            Ok(None)
        }
        Ok(raw) => Ok(Some(raw)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::info!(device = %device.display(), "No config on device");
            Ok(None)
        }
        Err(source) => Err(DeviceError::Read {
            device: device.to_path_buf(),
            path,
            source,
        }),
    }
}

// ============================================================================
// DEVICE ENUMERATION FETCHER
// ============================================================================

/// Tries every candidate device of a filesystem type, first payload wins.
#[derive(Clone, Debug)]
pub struct OvfFetcher<L, R> {
    lister: L,
    reader: R,
}

impl<L: BlockDeviceLister, R: DeviceConfigReader> OvfFetcher<L, R> {
    pub fn new(lister: L, reader: R) -> Self {
        Self { lister, reader }
    }

    /// Fetch the raw configuration from the first device of `fs_type` that has one.
    ///
    /// # Returns
    /// * `Ok(Some(raw))` - first non-empty payload; later devices are not touched
    /// * `Ok(None)` - no devices, or no device carried configuration
    /// * `Err(FetchError::Enumeration)` - listing failed, nothing was tried
    /// * `Err(FetchError::Candidate)` - the last candidate failed
    pub fn fetch(&self, fs_type: &FilesystemType) -> Result<Option<Vec<u8>>, FetchError> {
        let devices = self
            .lister
            .list(fs_type)
            .map_err(|source| FetchError::Enumeration {
                fs_type: fs_type.clone(),
                source,
            })?;

        if devices.is_empty() {
            tracing::info!(fs_type = %fs_type, "No metadata volume found");
            return Ok(None);
        }

        let mut last_error = None;
        for device in &devices {
            match self.reader.read(device, fs_type) {
                Ok(Some(raw)) => {
                    tracing::info!(
                        device = %device.display(),
                        bytes = raw.len(),
                        "Fetched config from metadata volume"
                    );
                    return Ok(Some(raw));
                }
                Ok(None) => last_error = None,
                Err(e) => {
                    tracing::warn!("Skipping device {}: {}", device.display(), e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(FetchError::Candidate(e)),
            None => Ok(None),
        }
    }
}

// ============================================================================
// PROVIDER
// ============================================================================

/// A named platform provider probing one or more filesystem types in order.
#[derive(Debug)]
pub struct OvfProvider<L, R> {
    name: &'static str,
    fs_types: Vec<FilesystemType>,
    fetcher: OvfFetcher<L, R>,
}

impl<L: BlockDeviceLister, R: DeviceConfigReader> OvfProvider<L, R> {
    pub fn new(
        name: &'static str,
        fs_types: Vec<FilesystemType>,
        fetcher: OvfFetcher<L, R>,
    ) -> Self {
        Self {
            name,
            fs_types,
            fetcher,
        }
    }

    pub fn fs_types(&self) -> &[FilesystemType] {
        &self.fs_types
    }
}

impl<L: BlockDeviceLister, R: DeviceConfigReader> ConfigProvider for OvfProvider<L, R> {
    fn name(&self) -> &'static str {
        self.name
    }

    /// Filesystem types are tried in order with the same rule as devices:
    /// an enumeration failure aborts, a candidate failure moves on and is
    /// reported only if no later type ends cleanly.
    fn fetch(&self) -> FirstbootResult<Option<Vec<u8>>> {
        let mut last_error = None;
        for fs_type in &self.fs_types {
            match self.fetcher.fetch(fs_type) {
                Ok(Some(raw)) => return Ok(Some(raw)),
                Ok(None) => last_error = None,
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => {
                    tracing::warn!(
                        provider = self.name,
                        "No config from {} volumes: {}",
                        fs_type,
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(e.into()),
            None => Ok(None),
        }
    }
}
