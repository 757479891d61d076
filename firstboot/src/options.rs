//! Pipeline options.
//!
//! Options come from an optional JSON file, then CLI flags / environment
//! variables override individual fields.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use firstboot_shared::constants::system::DEFAULT_CONFIG_DIR;
use firstboot_shared::errors::{FirstbootError, FirstbootResult};
use serde::{Deserialize, Serialize};

use crate::providers::azure;
use crate::providers::{FileProvider, ProviderChain};
use crate::storage::BlkidLister;

/// Platform whose provider supplies the provider fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Azure,
    #[serde(rename = "azurestack")]
    AzureStack,
    /// Read `config_file`
    File,
    /// No provider; only locally staged fragments apply
    None,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Azure => "azure",
            Platform::AzureStack => "azurestack",
            Platform::File => "file",
            Platform::None => "none",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = FirstbootError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "azure" => Ok(Platform::Azure),
            "azurestack" => Ok(Platform::AzureStack),
            "file" => Ok(Platform::File),
            "none" => Ok(Platform::None),
            other => Err(FirstbootError::InvalidArgument(format!(
                "unknown platform {:?} (expected azure, azurestack, file or none)",
                other
            ))),
        }
    }
}

/// Options for acquiring the first-boot configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchOptions {
    /// Directory holding `base.ign` and `user.ign`.
    pub system_config_dir: PathBuf,

    /// Providers tried in order for the provider fragment.
    pub platforms: Vec<Platform>,

    /// Path read by the `file` platform.
    pub config_file: Option<PathBuf>,

    /// Directory under which temporary mount points are created.
    pub mount_base: PathBuf,

    /// blkid binary used to enumerate metadata volumes.
    pub blkid_path: PathBuf,

    /// Skip optical drives that report no disc.
    pub check_media: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            system_config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            platforms: Vec::new(),
            config_file: None,
            mount_base: std::env::temp_dir(),
            blkid_path: PathBuf::from("blkid"),
            check_media: true,
        }
    }
}

impl FetchOptions {
    /// Load options from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> FirstbootResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FirstbootError::Config(format!(
                "Failed to read options file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content).map_err(|e| match e {
            FirstbootError::Config(msg) => {
                FirstbootError::Config(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn from_json(content: &str) -> FirstbootResult<Self> {
        let options: FetchOptions = serde_json::from_str(content)
            .map_err(|e| FirstbootError::Config(format!("invalid options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> FirstbootResult<()> {
        if self.platforms.contains(&Platform::None) && self.platforms.len() > 1 {
            return Err(FirstbootError::Config(
                "platform \"none\" cannot be combined with other platforms".into(),
            ));
        }
        if self.mount_base.as_os_str().is_empty() {
            return Err(FirstbootError::Config("mount_base must not be empty".into()));
        }
        Ok(())
    }

    /// Build the provider chain for the configured platforms.
    pub fn provider_chain(&self) -> ProviderChain {
        let mut chain = ProviderChain::new();
        for platform in &self.platforms {
            match platform {
                Platform::Azure => chain.push(Box::new(azure::azure(
                    self.lister(),
                    &self.mount_base,
                    self.check_media,
                ))),
                Platform::AzureStack => chain.push(Box::new(azure::azure_stack(
                    self.lister(),
                    &self.mount_base,
                    self.check_media,
                ))),
                Platform::File => {
                    chain.push(Box::new(FileProvider::new(self.config_file.clone())))
                }
                Platform::None => {}
            }
        }
        chain
    }

    fn lister(&self) -> BlkidLister {
        BlkidLister::new(&self.blkid_path)
    }
}
