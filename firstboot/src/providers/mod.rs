//! Configuration providers.
//!
//! A provider yields zero or one raw configuration payload:
//! - `Ok(Some(raw))`: configuration found
//! - `Ok(None)`: this provider has nothing configured; try the next one
//! - `Err(..)`: configured but the fetch failed
//!
//! Implementations:
//! - Azure / Azure Stack: OVF metadata volume
//! - File: an explicitly configured path
//!
//! The locally staged base/user fragments are read by [`system`].

pub mod azure;
pub mod error;
pub mod file;
pub mod ovf;
pub mod system;

use firstboot_shared::errors::FirstbootResult;

pub use error::{DeviceError, FetchError};
pub use file::FileProvider;
pub use ovf::{DeviceConfigReader, MountingReader, OvfFetcher, OvfProvider};

/// Source of the platform ("provider") configuration fragment.
pub trait ConfigProvider {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    fn fetch(&self) -> FirstbootResult<Option<Vec<u8>>>;
}

impl<T: ConfigProvider + ?Sized> ConfigProvider for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn fetch(&self) -> FirstbootResult<Option<Vec<u8>>> {
        (**self).fetch()
    }
}

/// Providers tried in order; the first one with configuration wins.
///
/// `Ok(None)` falls through to the next provider, an error stops the chain.
#[derive(Default)]
pub struct ProviderChain {
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl ProviderChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, provider: Box<dyn ConfigProvider>) {
        self.providers.push(provider);
    }

    pub fn with(mut self, provider: impl ConfigProvider + 'static) -> Self {
        self.push(Box::new(provider));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Fetch from the first provider that has configuration.
    ///
    /// Returns the winning provider's name with the payload.
    pub fn fetch_first(&self) -> FirstbootResult<Option<(&'static str, Vec<u8>)>> {
        for provider in &self.providers {
            tracing::debug!(provider = provider.name(), "Fetching provider config");
            if let Some(raw) = provider.fetch()? {
                return Ok(Some((provider.name(), raw)));
            }
            tracing::info!(provider = provider.name(), "No provider config");
        }
        Ok(None)
    }
}

impl ConfigProvider for ProviderChain {
    fn name(&self) -> &'static str {
        "chain"
    }

    fn fetch(&self) -> FirstbootResult<Option<Vec<u8>>> {
        Ok(self.fetch_first()?.map(|(_, raw)| raw))
    }
}

impl std::fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderChain")
            .field("providers", &self.names())
            .finish()
    }
}
