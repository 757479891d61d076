#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

const FIRSTBOOT_ENV: &[&str] = &[
    "FIRSTBOOT_SYSTEM_CONFIG_DIR",
    "FIRSTBOOT_PLATFORM",
    "FIRSTBOOT_CONFIG_FILE",
    "FIRSTBOOT_MOUNT_BASE",
    "FIRSTBOOT_BLKID",
    "FIRSTBOOT_OPTIONS",
    "RUST_LOG",
];

/// A scratch system config dir plus a provider config file location.
pub struct TestContext {
    pub dir: TempDir,
}

impl TestContext {
    pub fn system_dir(&self) -> PathBuf {
        self.dir.path().join("system")
    }

    pub fn provider_file(&self) -> PathBuf {
        self.dir.path().join("provider.ign")
    }

    pub fn stage(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.system_dir().join(name);
        fs::write(&path, content).expect("Failed to stage fragment");
        path
    }

    pub fn write_provider(&self, content: &[u8]) -> PathBuf {
        let path = self.provider_file();
        fs::write(&path, content).expect("Failed to write provider config");
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// `firstboot` with a clean environment.
    pub fn new_cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_firstboot"));
        cmd.timeout(Duration::from_secs(30));
        for var in FIRSTBOOT_ENV {
            cmd.env_remove(var);
        }
        cmd
    }

    /// `firstboot resolve` pointed at the scratch system dir.
    pub fn resolve_cmd(&self) -> Command {
        let mut cmd = self.new_cmd();
        cmd.arg("resolve").arg("--system-dir").arg(self.system_dir());
        cmd
    }
}

pub fn firstboot() -> TestContext {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::create_dir(dir.path().join("system")).expect("Failed to create system dir");
    TestContext { dir }
}
