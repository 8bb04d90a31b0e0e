//! ============================================================================
//! Provider Module - Account data access for the entitlement gate
//! ============================================================================
//! Abstracts how identity and pledge data reach the gate:
//! - `PatronProvider`: the capability interface the gate consumes
//! - `PatreonClient`: the one production adapter, backed by the Patreon
//!   API v1 over reqwest
//! ============================================================================

use anyhow::Result;
use async_trait::async_trait;

use crate::entitlement::{Commitment, Identity};

mod patreon;

pub use patreon::PatreonClient;

/// Data access the gate depends on. Both operations read remote state for the
/// current authorization context and have no other side effects. Transport
/// errors are opaque to the gate; retry policy, if any, lives behind this
/// trait, never in the gate.
#[async_trait]
pub trait PatronProvider: Send + Sync {
    /// Profile of the identity bound to the current authorization context
    async fn fetch_identity(&self) -> Result<Identity>;

    /// Every pledge record for the given campaign attributable to the current
    /// authorization context. All-or-error: a partial set is never returned.
    /// Order is upstream insertion order and carries no meaning to the gate.
    async fn fetch_commitments(&self, campaign_id: &str) -> Result<Vec<Commitment>>;
}
