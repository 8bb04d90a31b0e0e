//! ============================================================================
//! Entitlement Types - Accounts, pledges, and gate configuration
//! ============================================================================
//! Plain data shapes the gate evaluates. Built fresh from a provider fetch on
//! every evaluation, never mutated, never persisted.
//! ============================================================================

use serde::{Deserialize, Serialize};

/// Patreon user id of the campaign creator in the original deployment
pub const DEFAULT_OWNER_ID: &str = "12794096";

/// Campaign id protected by the original deployment
pub const DEFAULT_CAMPAIGN_ID: &str = "1976402";

/// Minimum aggregate pledge (in cents) for patron access
pub const DEFAULT_MIN_PLEDGE_CENTS: u64 = 500;

/// A Patreon account, either the campaign creator or a patron
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque platform-assigned id
    pub id: String,
    /// Display name components, either may be empty
    pub first_name: String,
    pub last_name: String,
    /// Platform status flags; any one set disqualifies good standing
    pub is_suspended: bool,
    pub is_deleted: bool,
    pub is_nuked: bool,
}

impl Identity {
    /// Space-joined display name. Two empty components yield a lone space;
    /// kept as released behavior rather than trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One pledge record tied to a campaign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    /// Pledge amount in minor currency units
    pub amount_cents: u64,
    /// False means the patron has not arranged to cover processing fees
    pub patron_pays_fees: bool,
    /// Tri-state: None = not applicable, Some(false) = explicitly unpaused,
    /// Some(true) = paused. Only Some(true) disqualifies.
    #[serde(default)]
    pub is_paused: Option<bool>,
}

/// Deployment-fixed gate configuration, passed in at construction so a single
/// binary can serve multiple campaigns and tests stay deterministic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Identity that bypasses all pledge and standing checks
    pub owner_id: String,
    /// The one campaign this gate protects
    pub campaign_id: String,
    /// Inclusive lower bound on the aggregate pledge amount
    pub minimum_amount_cents: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            owner_id: DEFAULT_OWNER_ID.to_string(),
            campaign_id: DEFAULT_CAMPAIGN_ID.to_string(),
            minimum_amount_cents: DEFAULT_MIN_PLEDGE_CENTS,
        }
    }
}
