//! Well-known names and paths
//!
//! These values are part of the boot-time contract with the platform and
//! with whoever stages local fragments into the image.

/// Metadata volume constants
pub mod ovf {
    /// Configuration file path, relative to the root of the mounted volume
    pub const CONFIG_PATH: &str = "CustomData.bin";

    /// Prefix for temporary mount point directories
    pub const MOUNT_PREFIX: &str = "firstboot-ovf";
}

/// Filesystem type tags understood by blkid and mount(2)
pub mod fstype {
    /// UDF, used by Azure for the OVF provisioning DVD
    pub const UDF: &str = "udf";

    /// ISO 9660, also offered by Azure Stack
    pub const ISO9660: &str = "iso9660";
}

/// Locally staged fragments
pub mod system {
    /// Default directory holding staged fragments
    pub const DEFAULT_CONFIG_DIR: &str = "/usr/lib/firstboot";

    /// Base fragment, always applied when present
    pub const BASE_FILENAME: &str = "base.ign";

    /// User fragment, preempts the provider fragment
    pub const USER_FILENAME: &str = "user.ign";
}

/// Environment variables read by the CLI
pub mod env {
    pub const SYSTEM_CONFIG_DIR: &str = "FIRSTBOOT_SYSTEM_CONFIG_DIR";
    pub const PLATFORM: &str = "FIRSTBOOT_PLATFORM";
    pub const CONFIG_FILE: &str = "FIRSTBOOT_CONFIG_FILE";
    pub const MOUNT_BASE: &str = "FIRSTBOOT_MOUNT_BASE";
    pub const BLKID: &str = "FIRSTBOOT_BLKID";
    pub const OPTIONS: &str = "FIRSTBOOT_OPTIONS";
}

/// CD-ROM ioctl constants from <linux/cdrom.h>
pub mod cdrom {
    /// Get tray position and media status
    pub const CDROM_DRIVE_STATUS: u64 = 0x5326;

    pub const CDS_NO_INFO: i32 = 0;
    pub const CDS_NO_DISC: i32 = 1;
    pub const CDS_TRAY_OPEN: i32 = 2;
    pub const CDS_DRIVE_NOT_READY: i32 = 3;
    pub const CDS_DISC_OK: i32 = 4;
}
