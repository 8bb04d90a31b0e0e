//! ============================================================================
//! Patreon Client - Production provider over the Patreon API v1
//! ============================================================================
//! Fetches the authenticated user and campaign pledges using an OAuth 2.0
//! access token:
//! - `current_user` for the profile
//! - `campaigns/{id}/pledges` with cursor pagination for pledge records
//!
//! Wire resources are JSON:API shaped; fields the gate does not evaluate are
//! dropped here. Pagination is followed to exhaustion so the gate always sees
//! the complete pledge set; a failed page fails the whole fetch.
//! ============================================================================

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use super::PatronProvider;
use crate::auth::{PatreonOAuth, PatreonTokens};
use crate::entitlement::{Commitment, Identity};

/// Patreon API v1 base
const PATREON_API_BASE: &str = "https://www.patreon.com/api/oauth2/api";

/// Pledges requested per page
const PLEDGE_PAGE_SIZE: u32 = 25;

/// Production provider bound to one access token
pub struct PatreonClient {
    client: reqwest::Client,
    access_token: String,
    api_base: String,
}

impl PatreonClient {
    /// Create a client from an existing OAuth 2.0 access token
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token: access_token.into(),
            api_base: PATREON_API_BASE.to_string(),
        }
    }

    /// Exchange an authorization code and build a client bound to the
    /// resulting access token. Tokens never leave this constructor.
    pub async fn from_authorization_code(oauth: &PatreonOAuth, code: &str) -> Result<Self> {
        let tokens = oauth
            .exchange_code(code)
            .await
            .map_err(|e| anyhow!("unable to create Patreon client: {}", e))?;
        Ok(Self::from_tokens(&tokens))
    }

    /// Create a client from previously obtained tokens
    pub fn from_tokens(tokens: &PatreonTokens) -> Self {
        Self::new(tokens.access_token.clone())
    }

    /// Update the access token (e.g., after refresh)
    pub fn set_access_token(&mut self, access_token: impl Into<String>) {
        self.access_token = access_token.into();
    }

    #[cfg(test)]
    fn with_api_base(access_token: &str, api_base: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token: access_token.into(),
            api_base: api_base.into(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .query(query)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .send()
            .await
            .map_err(|e| anyhow!("Patreon request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Patreon API error {}: {}", status, body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| anyhow!("Failed to parse Patreon response: {}", e))
    }
}

#[async_trait]
impl PatronProvider for PatreonClient {
    async fn fetch_identity(&self) -> Result<Identity> {
        let url = format!("{}/current_user", self.api_base);
        let response: UserResponse = self.get_json(&url, &[]).await?;

        debug!(user_id = %response.data.id, "fetched current user");
        Ok(response.data.into())
    }

    async fn fetch_commitments(&self, campaign_id: &str) -> Result<Vec<Commitment>> {
        let url = format!("{}/campaigns/{}/pledges", self.api_base, campaign_id);

        let mut commitments = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut query = vec![("page[count]", PLEDGE_PAGE_SIZE.to_string())];
            if let Some(cursor) = &cursor {
                query.push(("page[cursor]", cursor.clone()));
            }

            let page: PledgesResponse = self.get_json(&url, &query).await?;
            commitments.extend(page.data.into_iter().map(Commitment::from));

            match parse_next_cursor(&page.links) {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        info!(
            campaign_id,
            pledges = commitments.len(),
            "fetched campaign pledges"
        );
        Ok(commitments)
    }
}

/// Cursor for the next page, extracted from the JSON:API `links.next` URL's
/// `page[cursor]` query parameter. None ends pagination.
fn parse_next_cursor(links: &PageLinks) -> Option<String> {
    let next = links.next.as_deref()?;
    let url = Url::parse(next).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "page[cursor]")
        .map(|(_, value)| value.into_owned())
}

// --- Wire shapes (JSON:API) -------------------------------------------------

#[derive(Debug, Deserialize)]
struct UserResponse {
    data: UserResource,
}

#[derive(Debug, Deserialize)]
struct UserResource {
    id: String,
    attributes: UserAttributes,
}

#[derive(Debug, Default, Deserialize)]
struct UserAttributes {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    is_suspended: bool,
    #[serde(default)]
    is_deleted: bool,
    #[serde(default)]
    is_nuked: bool,
}

impl From<UserResource> for Identity {
    fn from(resource: UserResource) -> Self {
        Identity {
            id: resource.id,
            first_name: resource.attributes.first_name,
            last_name: resource.attributes.last_name,
            is_suspended: resource.attributes.is_suspended,
            is_deleted: resource.attributes.is_deleted,
            is_nuked: resource.attributes.is_nuked,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PledgesResponse {
    data: Vec<PledgeResource>,
    #[serde(default)]
    links: PageLinks,
}

#[derive(Debug, Deserialize)]
struct PledgeResource {
    attributes: PledgeAttributes,
}

#[derive(Debug, Default, Deserialize)]
struct PledgeAttributes {
    #[serde(default)]
    amount_cents: u64,
    #[serde(default)]
    patron_pays_fees: bool,
    #[serde(default)]
    is_paused: Option<bool>,
}

impl From<PledgeResource> for Commitment {
    fn from(resource: PledgeResource) -> Self {
        Commitment {
            amount_cents: resource.attributes.amount_cents,
            patron_pays_fees: resource.attributes.patron_pays_fees,
            is_paused: resource.attributes.is_paused,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PageLinks {
    #[serde(default)]
    next: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_drops_unknown_fields() {
        let json = r#"{
            "data": {
                "id": "12794096",
                "type": "user",
                "attributes": {
                    "first_name": "max",
                    "last_name": "naylor",
                    "is_suspended": false,
                    "is_deleted": false,
                    "is_nuked": false,
                    "email": "max@example.com",
                    "image_url": "https://example.com/avatar.png"
                }
            }
        }"#;

        let response: UserResponse = serde_json::from_str(json).unwrap();
        let identity: Identity = response.data.into();

        assert_eq!(identity.id, "12794096");
        assert_eq!(identity.full_name(), "max naylor");
        assert!(!identity.is_suspended);
    }

    #[test]
    fn test_missing_user_attributes_default() {
        let json = r#"{"data": {"id": "42", "attributes": {}}}"#;

        let response: UserResponse = serde_json::from_str(json).unwrap();
        let identity: Identity = response.data.into();

        assert_eq!(identity.id, "42");
        assert_eq!(identity.full_name(), " ");
        assert!(!identity.is_suspended && !identity.is_deleted && !identity.is_nuked);
    }

    #[test]
    fn test_pledge_page_preserves_paused_tri_state() {
        let json = r#"{
            "data": [
                {"type": "pledge", "id": "1", "attributes": {"amount_cents": 500, "patron_pays_fees": true}},
                {"type": "pledge", "id": "2", "attributes": {"amount_cents": 250, "patron_pays_fees": true, "is_paused": false}},
                {"type": "pledge", "id": "3", "attributes": {"amount_cents": 100, "patron_pays_fees": false, "is_paused": true}}
            ],
            "links": {}
        }"#;

        let page: PledgesResponse = serde_json::from_str(json).unwrap();
        let commitments: Vec<Commitment> = page.data.into_iter().map(Commitment::from).collect();

        assert_eq!(commitments.len(), 3);
        assert_eq!(commitments[0].is_paused, None);
        assert_eq!(commitments[1].is_paused, Some(false));
        assert_eq!(commitments[2].is_paused, Some(true));
        assert!(!commitments[2].patron_pays_fees);
    }

    #[test]
    fn test_next_cursor_extracted_from_links() {
        let links = PageLinks {
            next: Some(
                "https://www.patreon.com/api/oauth2/api/campaigns/1976402/pledges?page%5Bcount%5D=25&page%5Bcursor%5D=abc123"
                    .to_string(),
            ),
        };

        assert_eq!(parse_next_cursor(&links), Some("abc123".to_string()));
    }

    /// Minimal single-use HTTP listener; enough for canned JSON responses.
    /// `Connection: close` forces the client onto a fresh connection per
    /// request so each page is one accept.
    fn read_request(stream: &mut std::net::TcpStream) -> String {
        use std::io::Read;

        let mut bytes = Vec::new();
        let mut buf = [0u8; 1024];
        while !bytes.windows(4).any(|window| window == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            bytes.extend_from_slice(&buf[..n]);
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn write_json_response(stream: &mut std::net::TcpStream, body: &str) {
        use std::io::Write;

        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
    }

    #[tokio::test]
    async fn test_fetch_commitments_assembles_all_pages() {
        let page_one = r#"{
            "data": [
                {"type": "pledge", "id": "1", "attributes": {"amount_cents": 500, "patron_pays_fees": true}}
            ],
            "links": {"next": "https://www.patreon.com/api/oauth2/api/campaigns/1976402/pledges?page%5Bcount%5D=25&page%5Bcursor%5D=next-page"}
        }"#;
        let page_two = r#"{
            "data": [
                {"type": "pledge", "id": "2", "attributes": {"amount_cents": 250, "patron_pays_fees": true, "is_paused": false}}
            ],
            "links": {}
        }"#;

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = std::thread::spawn(move || {
            for _ in 0..2 {
                let (mut stream, _) = listener.accept().unwrap();
                let request = read_request(&mut stream);
                // The refreshed token must be the one on the wire
                assert!(request.contains("Bearer fresh-token"));
                let body = if request.contains("page%5Bcursor%5D=next-page") {
                    page_two
                } else {
                    page_one
                };
                write_json_response(&mut stream, body);
            }
        });

        let mut client =
            PatreonClient::with_api_base("stale-token", &format!("http://127.0.0.1:{port}"));
        client.set_access_token("fresh-token");

        let commitments = client.fetch_commitments("1976402").await.unwrap();
        server.join().unwrap();

        assert_eq!(
            commitments,
            vec![
                Commitment {
                    amount_cents: 500,
                    patron_pays_fees: true,
                    is_paused: None,
                },
                Commitment {
                    amount_cents: 250,
                    patron_pays_fees: true,
                    is_paused: Some(false),
                },
            ]
        );
    }

    #[test]
    fn test_missing_next_link_ends_pagination() {
        assert_eq!(parse_next_cursor(&PageLinks::default()), None);

        let no_cursor = PageLinks {
            next: Some("https://www.patreon.com/api/oauth2/api/campaigns/1/pledges".to_string()),
        };
        assert_eq!(parse_next_cursor(&no_cursor), None);
    }
}
