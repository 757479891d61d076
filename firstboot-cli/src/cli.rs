use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::list_devices::ListDevicesArgs;
use crate::commands::resolve::ResolveArgs;

#[derive(Parser, Debug)]
#[command(name = "firstboot", version, about = "Acquire first-boot configuration")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalFlags {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON options file; flags override its fields
    #[arg(long, global = true, env = firstboot_shared::constants::env::OPTIONS)]
    pub options: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List block devices carrying a filesystem type
    ListDevices(ListDevicesArgs),

    /// Acquire and resolve configuration fragments
    Resolve(ResolveArgs),
}
