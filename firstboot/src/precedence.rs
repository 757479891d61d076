//! Precedence resolution between base, user and provider fragments.
//!
//! Rules:
//! 1. Base, when present, is always applied.
//! 2. User, when present, is applied and preempts Provider.
//! 3. Without User, Provider is applied when present.
//! 4. Nothing present resolves to an empty outcome, which is valid.
//!
//! Precedence depends on which slots are filled, never on fragment contents.

use serde::Serialize;

use crate::fragment::{FragmentSet, Provenance, RawFragment};

/// Which provenance slots hold a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Presence {
    pub base: bool,
    pub user: bool,
    pub provider: bool,
}

impl Presence {
    pub fn new(base: bool, user: bool, provider: bool) -> Self {
        Self {
            base,
            user,
            provider,
        }
    }

    pub fn of(set: &FragmentSet) -> Self {
        Self::new(
            set.contains(Provenance::Base),
            set.contains(Provenance::User),
            set.contains(Provenance::Provider),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    Applied,
    Ignored,
}

impl Disposition {
    pub fn as_str(self) -> &'static str {
        match self {
            Disposition::Applied => "applied",
            Disposition::Ignored => "ignored",
        }
    }
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Disposition per slot; `None` for an absent fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Decision {
    pub base: Option<Disposition>,
    pub user: Option<Disposition>,
    pub provider: Option<Disposition>,
}

impl Decision {
    pub fn get(&self, provenance: Provenance) -> Option<Disposition> {
        match provenance {
            Provenance::Base => self.base,
            Provenance::User => self.user,
            Provenance::Provider => self.provider,
        }
    }

    pub fn is_applied(&self, provenance: Provenance) -> bool {
        self.get(provenance) == Some(Disposition::Applied)
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_none() && self.user.is_none() && self.provider.is_none()
    }
}

/// Decide which present fragments are authoritative.
pub fn resolve(presence: Presence) -> Decision {
    use Disposition::{Applied, Ignored};

    let (base, user, provider) = match (presence.base, presence.user, presence.provider) {
        // (base, user, provider)
        (false, false, false) => (None, None, None),
        (false, false, true) => (None, None, Some(Applied)),
        (false, true, false) => (None, Some(Applied), None),
        (false, true, true) => (None, Some(Applied), Some(Ignored)),
        (true, false, false) => (Some(Applied), None, None),
        (true, false, true) => (Some(Applied), None, Some(Applied)),
        (true, true, false) => (Some(Applied), Some(Applied), None),
        (true, true, true) => (Some(Applied), Some(Applied), Some(Ignored)),
    };

    Decision {
        base,
        user,
        provider,
    }
}

/// Whether fetching the provider can still change the outcome.
///
/// A present user fragment preempts the provider regardless of its content.
pub fn provider_needed(user_present: bool) -> bool {
    resolve(Presence::new(false, user_present, true)).provider != Some(Disposition::Ignored)
}

// ============================================================================
// OUTCOME
// ============================================================================

/// A present fragment together with its disposition.
#[derive(Debug, Clone)]
pub struct ResolvedFragment {
    fragment: RawFragment,
    disposition: Disposition,
}

impl ResolvedFragment {
    pub fn fragment(&self) -> &RawFragment {
        &self.fragment
    }

    pub fn provenance(&self) -> Provenance {
        self.fragment.provenance()
    }

    pub fn disposition(&self) -> Disposition {
        self.disposition
    }

    pub fn is_applied(&self) -> bool {
        self.disposition == Disposition::Applied
    }
}

/// Report line for one resolved fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentSummary {
    pub provenance: Provenance,
    pub disposition: Disposition,
    pub bytes: usize,
    pub sha256: String,
}

/// Every present fragment, in slot order, tagged applied or ignored.
#[derive(Debug, Clone, Default)]
pub struct ResolutionOutcome {
    entries: Vec<ResolvedFragment>,
}

impl ResolutionOutcome {
    pub fn entries(&self) -> &[ResolvedFragment] {
        &self.entries
    }

    /// No configuration from any source.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn disposition(&self, provenance: Provenance) -> Option<Disposition> {
        self.entries
            .iter()
            .find(|e| e.provenance() == provenance)
            .map(ResolvedFragment::disposition)
    }

    pub fn applied(&self) -> impl Iterator<Item = &RawFragment> {
        self.entries
            .iter()
            .filter(|e| e.is_applied())
            .map(ResolvedFragment::fragment)
    }

    pub fn ignored(&self) -> impl Iterator<Item = &RawFragment> {
        self.entries
            .iter()
            .filter(|e| !e.is_applied())
            .map(ResolvedFragment::fragment)
    }

    /// Applied fragments in application order (base first), for the parser.
    pub fn into_applied(self) -> Vec<RawFragment> {
        self.entries
            .into_iter()
            .filter(ResolvedFragment::is_applied)
            .map(|e| e.fragment)
            .collect()
    }

    pub fn summary(&self) -> Vec<FragmentSummary> {
        self.entries
            .iter()
            .map(|e| FragmentSummary {
                provenance: e.provenance(),
                disposition: e.disposition(),
                bytes: e.fragment.len(),
                sha256: e.fragment.sha256(),
            })
            .collect()
    }
}

impl FragmentSet {
    /// Resolve this set into an outcome. Uses presence only.
    pub fn resolve(self) -> ResolutionOutcome {
        let decision = resolve(Presence::of(&self));
        let entries = self
            .into_fragments()
            .filter_map(|fragment| {
                decision
                    .get(fragment.provenance())
                    .map(|disposition| ResolvedFragment {
                        fragment,
                        disposition,
                    })
            })
            .collect();
        ResolutionOutcome { entries }
    }
}
