use std::path::PathBuf;

use clap::Args;
use firstboot::FilesystemType;
use firstboot::storage::{BlkidLister, BlockDeviceLister};

use super::base_options;

#[derive(Args, Debug)]
pub struct ListDevicesArgs {
    /// Filesystem type(s) to look for
    #[arg(long = "fs-type", required = true, num_args = 1..)]
    pub fs_types: Vec<FilesystemType>,

    /// blkid binary
    #[arg(long, env = firstboot_shared::constants::env::BLKID)]
    pub blkid: Option<PathBuf>,
}

pub fn execute(args: ListDevicesArgs, global: &crate::cli::GlobalFlags) -> anyhow::Result<()> {
    let options = base_options(global)?;
    let lister = BlkidLister::new(args.blkid.unwrap_or(options.blkid_path));

    for fs_type in &args.fs_types {
        for device in lister.list(fs_type)? {
            println!("{}\t{}", fs_type, device.display());
        }
    }
    Ok(())
}
