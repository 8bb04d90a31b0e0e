//! ============================================================================
//! Auth Module - OAuth and Authentication Flows
//! ============================================================================
//! Handles authentication against Patreon:
//! - OAuth 2.0 authorization-code exchange and token refresh
//! ============================================================================

mod patreon_oauth;

pub use patreon_oauth::{PatreonOAuth, PatreonTokens};
