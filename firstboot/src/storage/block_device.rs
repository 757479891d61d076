//! Block device discovery.
//!
//! Enumerates block devices carrying a given filesystem type using blkid.

use std::path::PathBuf;
use std::process::Command;

use firstboot_shared::errors::{FirstbootError, FirstbootResult};

use super::FilesystemType;

/// blkid exit status when no device matched the search token.
const BLKID_NO_MATCH: i32 = 2;

/// Lists block devices whose filesystem type matches.
///
/// A failure means the enumeration mechanism itself is broken, not that a
/// device lacks configuration.
pub trait BlockDeviceLister {
    fn list(&self, fs_type: &FilesystemType) -> FirstbootResult<Vec<PathBuf>>;
}

impl<T: BlockDeviceLister + ?Sized> BlockDeviceLister for &T {
    fn list(&self, fs_type: &FilesystemType) -> FirstbootResult<Vec<PathBuf>> {
        (**self).list(fs_type)
    }
}

/// Lists devices by running `blkid -c /dev/null -o device -t TYPE=<fs>`.
///
/// The cache is bypassed so devices attached after the last cache refresh
/// (the provisioning DVD in particular) are always seen.
#[derive(Clone, Debug)]
pub struct BlkidLister {
    binary: PathBuf,
}

impl BlkidLister {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for BlkidLister {
    fn default() -> Self {
        Self::new("blkid")
    }
}

impl BlockDeviceLister for BlkidLister {
    fn list(&self, fs_type: &FilesystemType) -> FirstbootResult<Vec<PathBuf>> {
        tracing::debug!(
            blkid = %self.binary.display(),
            fs_type = %fs_type,
            "Listing block devices"
        );

        let output = Command::new(&self.binary)
            .args(["-c", "/dev/null", "-o", "device", "-t"])
            .arg(format!("TYPE={}", fs_type))
            .output()
            .map_err(|e| {
                FirstbootError::Enumeration(format!(
                    "Failed to run {}: {}",
                    self.binary.display(),
                    e
                ))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        match output.status.code() {
            Some(0) => {}
            Some(BLKID_NO_MATCH) if stdout.trim().is_empty() => {
                tracing::debug!(fs_type = %fs_type, "blkid found no matching devices");
                return Ok(Vec::new());
            }
            code => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(FirstbootError::Enumeration(format!(
                    "{} exited with code {:?}: {}",
                    self.binary.display(),
                    code,
                    stderr.trim()
                )));
            }
        }

        let devices = parse_device_list(&stdout);
        tracing::debug!(fs_type = %fs_type, count = devices.len(), "Found block devices");
        Ok(devices)
    }
}

/// Parse one device path per line, dropping blanks and repeats while keeping
/// the order blkid reported.
fn parse_device_list(stdout: &str) -> Vec<PathBuf> {
    let mut devices: Vec<PathBuf> = Vec::new();
    for line in stdout.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let device = PathBuf::from(line);
        if !devices.contains(&device) {
            devices.push(device);
        }
    }
    devices
}
