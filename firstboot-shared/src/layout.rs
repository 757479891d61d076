//! Layout of the local fragment directory.
//!
//! ```text
//! {root}/            # /usr/lib/firstboot by default
//! ├── base.ign       # base fragment
//! └── user.ign       # user fragment
//! ```

use std::path::{Path, PathBuf};

use crate::constants::system::{BASE_FILENAME, DEFAULT_CONFIG_DIR, USER_FILENAME};

/// Paths of the locally staged fragments.
#[derive(Clone, Debug)]
pub struct SystemConfigLayout {
    root: PathBuf,
}

impl SystemConfigLayout {
    /// Create a layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory containing the fragments.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Base fragment: {root}/base.ign
    pub fn base_config(&self) -> PathBuf {
        self.root.join(BASE_FILENAME)
    }

    /// User fragment: {root}/user.ign
    pub fn user_config(&self) -> PathBuf {
        self.root.join(USER_FILENAME)
    }
}

impl Default for SystemConfigLayout {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_DIR)
    }
}
