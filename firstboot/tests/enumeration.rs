//! Integration tests for metadata volume enumeration.
//!
//! Devices and their mount behaviour are scripted so the enumeration rules can
//! be checked without root or real block devices:
//! - absence (no devices, no file) is not an error
//! - the first non-empty payload wins and later devices are never touched
//! - per-device failures are skipped, listing failures are fatal

use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};

use firstboot::providers::{DeviceConfigReader, DeviceError, FetchError, OvfFetcher};
use firstboot::storage::{BlockDeviceLister, FilesystemType};
use firstboot::{FirstbootError, FirstbootResult};

// ============================================================================
// TEST FIXTURES
// ============================================================================

#[derive(Clone, Copy)]
enum Device {
    MountFails,
    NoConfig,
    EmptyConfig,
    Config(&'static [u8]),
}

struct FakeHost {
    devices: Vec<(&'static str, Device)>,
    listing_fails: bool,
    tried: RefCell<Vec<PathBuf>>,
}

impl FakeHost {
    fn new(devices: Vec<(&'static str, Device)>) -> Self {
        Self {
            devices,
            listing_fails: false,
            tried: RefCell::new(Vec::new()),
        }
    }

    fn broken() -> Self {
        Self {
            listing_fails: true,
            ..Self::new(vec![("/dev/sr0", Device::Config(b"unreachable"))])
        }
    }

    fn tried(&self) -> Vec<String> {
        self.tried
            .borrow()
            .iter()
            .map(|p| p.display().to_string())
            .collect()
    }
}

impl BlockDeviceLister for FakeHost {
    fn list(&self, _fs_type: &FilesystemType) -> FirstbootResult<Vec<PathBuf>> {
        if self.listing_fails {
            return Err(FirstbootError::Enumeration("blkid exited with code 4".into()));
        }
        Ok(self.devices.iter().map(|(p, _)| PathBuf::from(p)).collect())
    }
}

impl DeviceConfigReader for FakeHost {
    fn read(
        &self,
        device: &Path,
        _fs_type: &FilesystemType,
    ) -> Result<Option<Vec<u8>>, DeviceError> {
        self.tried.borrow_mut().push(device.to_path_buf());
        let (_, behaviour) = self
            .devices
            .iter()
            .find(|(p, _)| Path::new(p) == device)
            .expect("device was listed");

        match behaviour {
            Device::MountFails => Err(DeviceError::Mount {
                device: device.to_path_buf(),
                mount_point: PathBuf::from("/tmp/firstboot-ovf-fake"),
                source: io::Error::from_raw_os_error(libc::ENOMEDIUM),
            }),
            Device::NoConfig | Device::EmptyConfig => Ok(None),
            Device::Config(raw) => Ok(Some(raw.to_vec())),
        }
    }
}

fn fetch(host: &FakeHost) -> Result<Option<Vec<u8>>, FetchError> {
    OvfFetcher::new(host, host).fetch(&FilesystemType::UDF)
}

// ============================================================================
// ABSENCE
// ============================================================================

#[test]
fn no_devices_is_absence_not_failure() {
    let host = FakeHost::new(vec![]);
    assert!(fetch(&host).unwrap().is_none());
    assert!(host.tried().is_empty());
}

#[test]
fn devices_without_config_is_absence() {
    let host = FakeHost::new(vec![
        ("/dev/sr0", Device::NoConfig),
        ("/dev/sr1", Device::EmptyConfig),
    ]);
    assert!(fetch(&host).unwrap().is_none());
    assert_eq!(host.tried(), vec!["/dev/sr0", "/dev/sr1"]);
}

// ============================================================================
// ORDERING
// ============================================================================

#[test]
fn first_success_wins_and_stops_enumeration() {
    let host = FakeHost::new(vec![
        ("/dev/sr0", Device::MountFails),
        ("/dev/sr1", Device::NoConfig),
        ("/dev/sr2", Device::Config(b"X")),
        ("/dev/sr3", Device::Config(b"Y")),
    ]);

    let raw = fetch(&host).unwrap();

    assert_eq!(raw.as_deref(), Some(&b"X"[..]));
    assert_eq!(host.tried(), vec!["/dev/sr0", "/dev/sr1", "/dev/sr2"]);
}

// ============================================================================
// FAILURES
// ============================================================================

#[test]
fn listing_failure_is_fatal_and_tries_nothing() {
    let host = FakeHost::broken();

    let err = fetch(&host).unwrap_err();

    assert!(err.is_fatal());
    assert!(matches!(err, FetchError::Enumeration { .. }));
    assert!(host.tried().is_empty());
}

#[test]
fn failure_on_final_candidate_is_reported() {
    let host = FakeHost::new(vec![
        ("/dev/sr0", Device::NoConfig),
        ("/dev/sr1", Device::MountFails),
    ]);

    let err = fetch(&host).unwrap_err();

    assert!(!err.is_fatal());
    match err {
        FetchError::Candidate(device_err) => {
            assert_eq!(device_err.device(), Some(Path::new("/dev/sr1")));
        }
        other => panic!("expected candidate error, got {other:?}"),
    }
}

#[test]
fn single_bad_device_surfaces_device_path() {
    let host = FakeHost::new(vec![("/dev/sr0", Device::MountFails)]);

    let err: FirstbootError = fetch(&host).unwrap_err().into();

    assert!(matches!(err, FirstbootError::Device(_)));
    assert!(err.to_string().contains("/dev/sr0"));
}
