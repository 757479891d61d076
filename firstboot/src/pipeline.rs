//! Configuration acquisition pipeline.
//!
//! Reads the locally staged fragments, fetches the provider fragment when it
//! can still matter, and resolves precedence. Parsing the resolved payloads
//! is left to the caller.

use firstboot_shared::SystemConfigLayout;
use firstboot_shared::errors::FirstbootResult;

use crate::fragment::{FragmentSet, Provenance, RawFragment};
use crate::options::FetchOptions;
use crate::precedence::{ResolutionOutcome, provider_needed};
use crate::providers::{ConfigProvider, ProviderChain, system};

/// Acquires and resolves the first-boot configuration.
pub struct ConfigPipeline<P> {
    layout: SystemConfigLayout,
    provider: P,
}

impl ConfigPipeline<ProviderChain> {
    /// Pipeline wired from options: system dir layout plus the platform chain.
    pub fn from_options(options: &FetchOptions) -> Self {
        Self::new(
            SystemConfigLayout::new(&options.system_config_dir),
            options.provider_chain(),
        )
    }
}

impl<P: ConfigProvider> ConfigPipeline<P> {
    pub fn new(layout: SystemConfigLayout, provider: P) -> Self {
        Self { layout, provider }
    }

    pub fn layout(&self) -> &SystemConfigLayout {
        &self.layout
    }

    /// Collect fragments from every source and resolve them.
    ///
    /// The provider is only fetched when no user fragment is staged: a user
    /// fragment preempts it whatever it contains, and fetching may mean
    /// mounting devices.
    ///
    /// An empty outcome (no configuration anywhere) is `Ok`.
    pub fn acquire(&self) -> FirstbootResult<ResolutionOutcome> {
        let mut fragments = FragmentSet::new();

        if let Some(raw) = system::fetch_base_config(&self.layout)? {
            fragments.insert(RawFragment::new(Provenance::Base, raw));
        }

        let user = system::fetch_user_config(&self.layout)?;
        let user_present = user.is_some();
        if let Some(raw) = user {
            fragments.insert(RawFragment::new(Provenance::User, raw));
        }

        if provider_needed(user_present) {
            if let Some(raw) = self.provider.fetch()? {
                fragments.insert(RawFragment::new(Provenance::Provider, raw));
            }
        } else {
            tracing::info!(
                provider = self.provider.name(),
                "User config present, provider config preempted"
            );
        }

        let outcome = fragments.resolve();
        if outcome.is_empty() {
            tracing::info!("No configuration from any source");
        }
        for entry in outcome.entries() {
            tracing::info!(
                provenance = %entry.provenance(),
                disposition = ?entry.disposition(),
                bytes = entry.fragment().len(),
                "Resolved config fragment"
            );
        }
        Ok(outcome)
    }
}
