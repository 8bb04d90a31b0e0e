//! ============================================================================
//! Entitlement Gate - The access decision
//! ============================================================================
//! Single-pass decision function over provider data:
//! - Creator bypass runs before any pledge fetch (saves a request)
//! - Minimum-pledge check runs before standing checks so an unfunded user
//!   gets a funding message rather than a standing message
//! - Standing checks short-circuit in fixed order: suspended, deleted,
//!   nuked, then per-pledge fees and pause flags
//!
//! The gate holds no mutable state; every authenticate() call is independent
//! and safe to invoke concurrently.
//! ============================================================================

use tracing::{debug, info, warn};

use super::error::{EntitlementError, StandingIssue};
use super::types::{Commitment, GateConfig, Identity};
use crate::provider::PatronProvider;

/// Pledge-gated access decision over a provider
pub struct EntitlementGate<P> {
    provider: P,
    config: GateConfig,
}

impl<P: PatronProvider> EntitlementGate<P> {
    /// Create a gate over the given provider and deployment configuration
    pub fn new(provider: P, config: GateConfig) -> Self {
        Self { provider, config }
    }

    /// The configuration this gate enforces
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Decide access for the provider's authorization context.
    /// Returns the user's display name on success, or the specific denial.
    pub async fn authenticate(&self) -> Result<String, EntitlementError> {
        let identity = self
            .provider
            .fetch_identity()
            .await
            .map_err(|source| EntitlementError::IdentityUnavailable { source })?;

        if identity.id == self.config.owner_id {
            debug!(user_id = %identity.id, "creator access, skipping pledge checks");
            return Ok(identity.full_name());
        }

        let commitments = self
            .provider
            .fetch_commitments(&self.config.campaign_id)
            .await
            .map_err(|source| EntitlementError::CommitmentsUnavailable { source })?;

        let total_cents = total_amount_cents(&commitments);
        if total_cents < self.config.minimum_amount_cents {
            warn!(
                user_id = %identity.id,
                total_cents,
                minimum_cents = self.config.minimum_amount_cents,
                "pledge total below campaign minimum"
            );
            return Err(EntitlementError::InsufficientPledge {
                total_cents,
                minimum_cents: self.config.minimum_amount_cents,
            });
        }

        if let Some(issue) = standing_issue(&identity, &commitments) {
            warn!(user_id = %identity.id, %issue, "patron not in good standing");
            return Err(EntitlementError::NotInGoodStanding(issue));
        }

        info!(user_id = %identity.id, "patron access granted");
        Ok(identity.full_name())
    }
}

/// Sum of pledge amounts; order-independent, empty yields 0
fn total_amount_cents(commitments: &[Commitment]) -> u64 {
    commitments.iter().map(|c| c.amount_cents).sum()
}

/// First failing standing check, or None when the account is in good standing.
/// Account flags are checked before pledge records; within a pledge, unpaid
/// fees are checked before the pause flag.
fn standing_issue(identity: &Identity, commitments: &[Commitment]) -> Option<StandingIssue> {
    if identity.is_suspended {
        return Some(StandingIssue::Suspended);
    }
    if identity.is_deleted {
        return Some(StandingIssue::Deleted);
    }
    if identity.is_nuked {
        return Some(StandingIssue::Nuked);
    }
    for commitment in commitments {
        if !commitment.patron_pays_fees {
            return Some(StandingIssue::UnpaidFees);
        }
        if commitment.is_paused == Some(true) {
            return Some(StandingIssue::Paused);
        }
    }
    None
}
