//! ============================================================================
//! Entitlement Module - Pledge-gated access control
//! ============================================================================
//! Decides access to creator-gated content based on Patreon standing.
//!
//! ## Outcomes
//! - **Creator**: the campaign owner, unconditional access
//! - **Patron**: pledge total meets the minimum and the account is in good
//!   standing (not suspended/deleted/nuked, fees paid, nothing paused)
//! - Everyone else gets a denial naming the specific failed check
//!
//! ## Usage
//! ```rust,ignore
//! use patron_core::entitlement::{EntitlementGate, GateConfig};
//!
//! let gate = EntitlementGate::new(client, GateConfig::default());
//! let display_name = gate.authenticate().await?;
//! ```
//! ============================================================================

mod error;
mod gate;
mod types;

// Re-export public types
pub use error::{EntitlementError, StandingIssue};
pub use gate::EntitlementGate;
pub use types::{
    Commitment, GateConfig, Identity, DEFAULT_CAMPAIGN_ID, DEFAULT_MIN_PLEDGE_CENTS,
    DEFAULT_OWNER_ID,
};
