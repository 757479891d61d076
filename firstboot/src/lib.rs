//! First-boot configuration acquisition.
//!
//! Locates raw configuration fragments (a platform metadata volume, a
//! configured file, locally staged base/user fragments) and resolves which
//! of them govern the boot. Parsing and applying the configuration happen
//! downstream of this crate.

#[cfg(not(target_os = "linux"))]
compile_error!("firstboot mounts block devices and is Linux-only; build with a Linux target");

pub mod fragment;
pub mod options;
pub mod pipeline;
pub mod precedence;
pub mod providers;
pub mod storage;

pub use firstboot_shared::{FirstbootError, FirstbootResult};
pub use fragment::{FragmentSet, Provenance, RawFragment};
pub use options::{FetchOptions, Platform};
pub use pipeline::ConfigPipeline;
pub use precedence::{Decision, Disposition, Presence, ResolutionOutcome, resolve};
pub use providers::{ConfigProvider, ProviderChain};
pub use storage::FilesystemType;
