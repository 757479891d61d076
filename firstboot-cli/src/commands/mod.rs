pub mod list_devices;
pub mod resolve;

use anyhow::Context;
use firstboot::FetchOptions;

use crate::cli::GlobalFlags;

/// Options from `--options` when given, defaults otherwise.
pub fn base_options(global: &GlobalFlags) -> anyhow::Result<FetchOptions> {
    match &global.options {
        Some(path) => FetchOptions::load(path)
            .with_context(|| format!("Failed to load options from {}", path.display())),
        None => Ok(FetchOptions::default()),
    }
}
