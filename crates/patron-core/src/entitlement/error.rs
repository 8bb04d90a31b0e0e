//! ============================================================================
//! Entitlement Errors - Denial taxonomy for the gate
//! ============================================================================
//! Every denial carries the specific check that failed. Transport failures
//! wrap the provider's error; rule failures are self-describing.
//! ============================================================================

use thiserror::Error;

/// Why an authenticate() call was denied
#[derive(Debug, Error)]
pub enum EntitlementError {
    /// The provider could not return the user's profile
    #[error("unable to fetch user: {source}")]
    IdentityUnavailable {
        #[source]
        source: anyhow::Error,
    },

    /// The provider could not return the campaign's pledge records
    #[error("unable to fetch user's pledges: {source}")]
    CommitmentsUnavailable {
        #[source]
        source: anyhow::Error,
    },

    /// Aggregate pledge amount is below the campaign minimum
    #[error("patron level not high enough to access content")]
    InsufficientPledge {
        total_cents: u64,
        minimum_cents: u64,
    },

    /// The account or one of its pledges fails a standing check
    #[error("user is not in good standing with this campaign: {0}")]
    NotInGoodStanding(#[source] StandingIssue),
}

/// The specific standing check that failed, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StandingIssue {
    #[error("user is suspended")]
    Suspended,
    #[error("user is deleted")]
    Deleted,
    #[error("user is nuked")]
    Nuked,
    #[error("user has unpaid fees")]
    UnpaidFees,
    #[error("user is paused")]
    Paused,
}
