//! Storage operations for metadata volumes.
//!
//! - Block device discovery via blkid
//! - Optical drive media probing
//! - Scoped read-only mounts with guaranteed cleanup

pub mod block_device;
pub mod cdrom;
pub mod mount_scope;

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use firstboot_shared::constants::fstype;
use firstboot_shared::errors::FirstbootError;

pub use block_device::{BlkidLister, BlockDeviceLister};
pub use mount_scope::MountScope;

/// Filesystem type tag used to filter candidate devices and passed to mount(2).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FilesystemType(Cow<'static, str>);

impl FilesystemType {
    pub const UDF: FilesystemType = FilesystemType(Cow::Borrowed(fstype::UDF));
    pub const ISO9660: FilesystemType = FilesystemType(Cow::Borrowed(fstype::ISO9660));

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilesystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for FilesystemType {
    type Err = FirstbootError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        // The tag ends up in a blkid TYPE= token, keep it to a bare word.
        if tag.is_empty()
            || !tag
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(FirstbootError::InvalidArgument(format!(
                "invalid filesystem type: {:?}",
                s
            )));
        }
        Ok(FilesystemType(Cow::Owned(tag.to_ascii_lowercase())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filesystem_type() {
        assert_eq!("udf".parse::<FilesystemType>().unwrap(), FilesystemType::UDF);
        assert_eq!(
            " ISO9660 ".parse::<FilesystemType>().unwrap(),
            FilesystemType::ISO9660
        );
    }

    #[test]
    fn test_reject_malformed_filesystem_type() {
        assert!("".parse::<FilesystemType>().is_err());
        assert!("udf,ext4".parse::<FilesystemType>().is_err());
        assert!("TYPE=udf".parse::<FilesystemType>().is_err());
    }
}
