//! Raw configuration fragments and their provenance.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Origin slot a fragment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Locally staged `base.ign`
    Base,
    /// Locally staged `user.ign`
    User,
    /// Platform provider (metadata volume, config file)
    Provider,
}

impl Provenance {
    pub const ALL: [Provenance; 3] = [Provenance::Base, Provenance::User, Provenance::Provider];

    pub fn as_str(self) -> &'static str {
        match self {
            Provenance::Base => "base",
            Provenance::User => "user",
            Provenance::Provider => "provider",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An uninterpreted configuration payload. Immutable once created.
#[derive(Clone, PartialEq, Eq)]
pub struct RawFragment {
    provenance: Provenance,
    bytes: Vec<u8>,
}

impl RawFragment {
    pub fn new(provenance: Provenance, bytes: Vec<u8>) -> Self {
        Self { provenance, bytes }
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Hex SHA-256 of the payload, for reports.
    pub fn sha256(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }

    /// Hand the payload over to the parser.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

// Payloads may carry secrets; keep them out of debug logs.
impl fmt::Debug for RawFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawFragment")
            .field("provenance", &self.provenance)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// At most one fragment per provenance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentSet {
    base: Option<RawFragment>,
    user: Option<RawFragment>,
    provider: Option<RawFragment>,
}

impl FragmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from the optional payload of each slot.
    pub fn from_parts(
        base: Option<Vec<u8>>,
        user: Option<Vec<u8>>,
        provider: Option<Vec<u8>>,
    ) -> Self {
        Self {
            base: base.map(|b| RawFragment::new(Provenance::Base, b)),
            user: user.map(|b| RawFragment::new(Provenance::User, b)),
            provider: provider.map(|b| RawFragment::new(Provenance::Provider, b)),
        }
    }

    /// Store a fragment in its provenance slot, returning the one it replaced.
    pub fn insert(&mut self, fragment: RawFragment) -> Option<RawFragment> {
        self.slot_mut(fragment.provenance()).replace(fragment)
    }

    pub fn get(&self, provenance: Provenance) -> Option<&RawFragment> {
        match provenance {
            Provenance::Base => self.base.as_ref(),
            Provenance::User => self.user.as_ref(),
            Provenance::Provider => self.provider.as_ref(),
        }
    }

    pub fn contains(&self, provenance: Provenance) -> bool {
        self.get(provenance).is_some()
    }

    pub fn is_empty(&self) -> bool {
        Provenance::ALL.iter().all(|p| !self.contains(*p))
    }

    /// Fragments in slot order (base, user, provider).
    pub fn into_fragments(self) -> impl Iterator<Item = RawFragment> {
        [self.base, self.user, self.provider].into_iter().flatten()
    }

    fn slot_mut(&mut self, provenance: Provenance) -> &mut Option<RawFragment> {
        match provenance {
            Provenance::Base => &mut self.base,
            Provenance::User => &mut self.user,
            Provenance::Provider => &mut self.provider,
        }
    }
}
