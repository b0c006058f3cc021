//! The decision lattice every evaluation step produces.
//!
//! Besides the three definite outcomes (`Permit`, `Deny`, `NotApplicable`)
//! the lattice keeps the Indeterminate sub-variants apart. They record which
//! definite decisions were still reachable when an error occurred, and the
//! combining algorithms depend on that distinction to resolve precedence.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The outcome of evaluating a rule, a policy, or a whole request.
///
/// Expressed in kebab-case when serialized, so configuration files read
/// `default_decision = "not-applicable"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Decision {
    Permit,
    Deny,
    NotApplicable,
    /// Generic Indeterminate. Combining algorithms treat it like
    /// `IndeterminateDenyPermit`.
    Indeterminate,
    /// An error occurred; only `Deny` could have been reached.
    IndeterminateDeny,
    /// An error occurred; only `Permit` could have been reached.
    IndeterminatePermit,
    /// An error occurred; either definite decision could have been reached.
    IndeterminateDenyPermit,
}

impl Decision {
    /// True for `Indeterminate` and all of its sub-variants.
    pub fn is_indeterminate(self) -> bool {
        matches!(
            self,
            Decision::Indeterminate
                | Decision::IndeterminateDeny
                | Decision::IndeterminatePermit
                | Decision::IndeterminateDenyPermit
        )
    }

    /// The Indeterminate sub-variant that records `self` as the only
    /// reachable definite outcome.
    ///
    /// `Permit` maps to `IndeterminatePermit`, `Deny` to `IndeterminateDeny`.
    /// Everything else is returned unchanged.
    pub fn as_indeterminate(self) -> Decision {
        match self {
            Decision::Permit => Decision::IndeterminatePermit,
            Decision::Deny => Decision::IndeterminateDeny,
            other => other,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Decision::Permit => "Permit",
            Decision::Deny => "Deny",
            Decision::NotApplicable => "NotApplicable",
            Decision::Indeterminate => "Indeterminate",
            Decision::IndeterminateDeny => "Indeterminate{D}",
            Decision::IndeterminatePermit => "Indeterminate{P}",
            Decision::IndeterminateDenyPermit => "Indeterminate{DP}",
        };
        f.write_str(s)
    }
}
