//! ============================================================================
//! PATRON-CORE: Patreon-Gated Access Control
//! ============================================================================
//! This crate decides whether a user may access creator-gated content:
//! - Entitlement gate: creator bypass, minimum-pledge and good-standing rules
//! - Provider interface for fetching identity and pledge data
//! - Patreon API v1 adapter (reqwest) with cursor pagination
//! - OAuth 2.0 authorization-code exchange for Patreon
//! ============================================================================

pub mod auth;
pub mod entitlement;
pub mod provider;

// Re-export main types for convenience
pub use auth::{PatreonOAuth, PatreonTokens};
pub use entitlement::{
    Commitment, EntitlementError, EntitlementGate, GateConfig, Identity, StandingIssue,
};
pub use provider::{PatreonClient, PatronProvider};
