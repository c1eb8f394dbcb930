//! HTTP client for the BambooHR users endpoint.
//!
//! Every request the client sends carries
//! `Authorization: Basic base64(<api key>:x)`. The header is installed once as
//! a default header when the client is built, so it applies to every path
//! under the configured host.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// A user record as returned by the API.
///
/// Fields missing from a record decode to their zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    /// Numeric user id.
    pub id: i64,
    /// Linked employee id, `0` when the user is not an employee.
    pub employee_id: i64,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email address.
    pub email: String,
    /// Account status, e.g. `enabled`.
    pub status: String,
    /// Last login timestamp as sent by the server.
    pub last_login: String,
}

/// Client for the BambooHR API.
///
/// Holds no mutable state after construction, so clones can be shared
/// freely across concurrent reads.
#[derive(Debug, Clone)]
pub struct BambooClient {
    http: Client,
    host: String,
    company: String,
}

impl BambooClient {
    /// Build a client from resolved configuration.
    ///
    /// Inputs are not validated here; errors only come from building the
    /// underlying HTTP client.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, basic_auth_header(&config.api_key)?);

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("bamboo-provider/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            host: config.host,
            company: config.company,
        })
    }

    /// The configured host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The configured company.
    pub fn company(&self) -> &str {
        &self.company
    }

    /// URL of the users listing.
    pub fn users_url(&self) -> String {
        format!(
            "{}/{}/v1/meta/users/",
            self.host.trim_end_matches('/'),
            self.company
        )
    }

    /// Fetch every user.
    ///
    /// The server answers with an object keyed by an opaque user id. Keys are
    /// dropped and the records are returned sorted by `id`, then
    /// `employee_id`, so repeated reads of the same data produce the same
    /// list.
    #[instrument(skip(self), fields(company = %self.company))]
    pub async fn get_users(&self) -> Result<Vec<User>, ClientError> {
        let url = self.users_url();
        debug!(url = %url, "Fetching users");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Users request rejected");
            return Err(ClientError::UnexpectedStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        let users = decode_users(&body)?;
        debug!(count = users.len(), "Fetched users");
        Ok(users)
    }
}

/// `Basic base64(<api key>:x)`, marked sensitive so it stays out of debug output.
fn basic_auth_header(api_key: &str) -> Result<HeaderValue, ClientError> {
    let encoded = STANDARD.encode(format!("{}:x", api_key));
    let mut value = HeaderValue::from_str(&format!("Basic {}", encoded))?;
    value.set_sensitive(true);
    Ok(value)
}

fn decode_users(body: &[u8]) -> Result<Vec<User>, ClientError> {
    let by_key: HashMap<String, User> = serde_json::from_slice(body)?;
    let mut users: Vec<User> = by_key.into_values().collect();
    users.sort_by_key(|u| (u.id, u.employee_id));
    Ok(users)
}
