//! Azure and Azure Stack providers.
//!
//! Both deliver custom data on an OVF provisioning volume. Azure uses a UDF
//! DVD; Azure Stack may present it as UDF or ISO 9660.

use std::path::PathBuf;

use super::ovf::{MountingReader, OvfFetcher, OvfProvider};
use crate::storage::{BlkidLister, FilesystemType};

pub type AzureProvider = OvfProvider<BlkidLister, MountingReader>;

/// Filesystem types probed on Azure.
pub fn azure_fs_types() -> Vec<FilesystemType> {
    vec![FilesystemType::UDF]
}

/// Filesystem types probed on Azure Stack, in order.
pub fn azure_stack_fs_types() -> Vec<FilesystemType> {
    vec![FilesystemType::UDF, FilesystemType::ISO9660]
}

pub fn azure(
    lister: BlkidLister,
    mount_base: impl Into<PathBuf>,
    check_media: bool,
) -> AzureProvider {
    OvfProvider::new(
        "azure",
        azure_fs_types(),
        OvfFetcher::new(lister, reader(mount_base, check_media)),
    )
}

pub fn azure_stack(
    lister: BlkidLister,
    mount_base: impl Into<PathBuf>,
    check_media: bool,
) -> AzureProvider {
    OvfProvider::new(
        "azurestack",
        azure_stack_fs_types(),
        OvfFetcher::new(lister, reader(mount_base, check_media)),
    )
}

fn reader(mount_base: impl Into<PathBuf>, check_media: bool) -> MountingReader {
    MountingReader::new(mount_base).with_media_check(check_media)
}
