//! Optical drive media probing.
//!
//! Platforms attach the provisioning volume as a virtual DVD. Asking the drive
//! whether a disc is loaded avoids a slow, noisy mount attempt on an empty tray.

use std::fs::OpenOptions;
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::Path;

use firstboot_shared::constants::cdrom::{
    CDROM_DRIVE_STATUS, CDS_DISC_OK, CDS_DRIVE_NOT_READY, CDS_NO_DISC, CDS_NO_INFO, CDS_TRAY_OPEN,
};

/// Slot argument selecting the current disc.
const CDSL_CURRENT: libc::c_int = libc::c_int::MAX;

/// Drive status reported by `CDROM_DRIVE_STATUS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveStatus {
    NoInfo,
    NoDisc,
    TrayOpen,
    NotReady,
    DiscOk,
    Unknown(i32),
}

impl DriveStatus {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            CDS_NO_INFO => DriveStatus::NoInfo,
            CDS_NO_DISC => DriveStatus::NoDisc,
            CDS_TRAY_OPEN => DriveStatus::TrayOpen,
            CDS_DRIVE_NOT_READY => DriveStatus::NotReady,
            CDS_DISC_OK => DriveStatus::DiscOk,
            other => DriveStatus::Unknown(other),
        }
    }

    pub fn has_media(self) -> bool {
        self == DriveStatus::DiscOk
    }
}

/// Query the media status of an optical drive.
///
/// Returns `ENOTTY`/`EINVAL` as an error when `device` is not an optical drive.
pub fn drive_status(device: &Path) -> io::Result<DriveStatus> {
    tracing::debug!(device = %device.display(), "Getting drive status");

    // O_NONBLOCK lets the open succeed on an empty tray.
    let file = OpenOptions::new()
        .read(true)
        .custom_flags(libc::O_NONBLOCK)
        .open(device)?;

    let ret = unsafe { libc::ioctl(file.as_raw_fd(), CDROM_DRIVE_STATUS as _, CDSL_CURRENT) };
    if ret < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(DriveStatus::from_raw(ret))
}

/// Whether the ioctl error means "this is not an optical drive".
pub fn is_not_optical(err: &io::Error) -> bool {
    matches!(err.raw_os_error(), Some(libc::ENOTTY) | Some(libc::EINVAL))
}
