//! Error types for metadata volume fetching.
//!
//! Errors are categorized by how the enumeration loop reacts:
//! - [`DeviceError`]: one candidate device failed (skip it, try the next)
//! - [`FetchError::Enumeration`]: listing devices failed (fatal, abort)

use std::io;
use std::path::{Path, PathBuf};

use firstboot_shared::errors::FirstbootError;
use thiserror::Error;

use crate::storage::FilesystemType;

// ============================================================================
// Per-candidate errors (skippable)
// ============================================================================

/// A single candidate device could not yield its configuration.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Temporary mount point could not be created.
    #[error("failed to create mount point under {}: {source}", base_dir.display())]
    MountPoint {
        base_dir: PathBuf,
        #[source]
        source: io::Error,
    },

    /// mount(2) failed.
    #[error("failed to mount device {} at {}: {source}", device.display(), mount_point.display())]
    Mount {
        device: PathBuf,
        mount_point: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config file exists on the volume but could not be read.
    #[error("failed to read config {} from device {}: {source}", path.display(), device.display())]
    Read {
        device: PathBuf,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeviceError {
    /// Device the error concerns, if any.
    pub fn device(&self) -> Option<&Path> {
        match self {
            DeviceError::MountPoint { .. } => None,
            DeviceError::Mount { device, .. } | DeviceError::Read { device, .. } => {
                Some(device.as_path())
            }
        }
    }
}

// ============================================================================
// Fetch errors
// ============================================================================

/// Outcome of a failed metadata volume fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The device listing mechanism failed; no candidate was tried.
    #[error("failed to retrieve block devices with TYPE={fs_type}: {source}")]
    Enumeration {
        fs_type: FilesystemType,
        #[source]
        source: FirstbootError,
    },

    /// Every candidate was tried and the last one failed.
    #[error("failed to retrieve config: {0}")]
    Candidate(#[from] DeviceError),
}

impl FetchError {
    /// Whether the enumeration mechanism itself is broken.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FetchError::Enumeration { .. })
    }
}

impl From<FetchError> for FirstbootError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Enumeration { .. } => FirstbootError::Enumeration(err.to_string()),
            FetchError::Candidate(_) => FirstbootError::Device(err.to_string()),
        }
    }
}
