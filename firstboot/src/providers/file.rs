//! Provider reading the configuration from an explicitly configured file.
//!
//! Used on bare metal and in test harnesses where the platform offers no
//! metadata service.

use std::path::{Path, PathBuf};

use firstboot_shared::errors::FirstbootResult;

use super::ConfigProvider;
use super::system::read_config_file;

#[derive(Clone, Debug, Default)]
pub struct FileProvider {
    path: Option<PathBuf>,
}

impl FileProvider {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl ConfigProvider for FileProvider {
    fn name(&self) -> &'static str {
        "file"
    }

    fn fetch(&self) -> FirstbootResult<Option<Vec<u8>>> {
        match &self.path {
            Some(path) => read_config_file(path),
            None => {
                tracing::info!("No config file configured");
                Ok(None)
            }
        }
    }
}
