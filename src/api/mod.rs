//! REST client for the SonarCloud Web API.
//!
//! One module per endpoint group. Mutating endpoints are form-encoded
//! `POST`s, queries are `GET`s; every call authenticates with the user
//! token as the basic-auth username. A failed call surfaces immediately as
//! a [`ProviderError`]; there is no retry or backoff layer.

pub mod permissions;
pub mod projects;
pub mod quality_gates;
pub mod settings;
pub mod user_groups;
pub mod user_tokens;
pub mod webhooks;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::ProviderError;

const SONARCLOUD_API_BASE: &str = "https://sonarcloud.io/api";

/// Paging envelope returned by SonarCloud search endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Paging {
    /// 1-based index of the returned page.
    #[serde(rename = "pageIndex")]
    pub page_index: u32,
    /// Number of entries per page.
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    /// Total number of matching entries.
    pub total: u32,
}

impl Paging {
    /// True when a further page exists after this one.
    pub fn has_more(&self) -> bool {
        self.page_index * self.page_size < self.total
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    msg: String,
}

/// Client for the SonarCloud Web API, scoped to a single organization.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    organization: String,
    token: String,
}

impl Client {
    /// Create a client for the given organization, authenticating with the
    /// given user token.
    pub fn new(
        organization: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        Self::with_base_url(organization, token, SONARCLOUD_API_BASE)
    }

    /// Create a client against a non-default API base URL.
    ///
    /// NOTE: Primarily used for testing with mock servers.
    pub fn with_base_url(
        organization: impl Into<String>,
        token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(ProviderError::Http)?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            organization: organization.into(),
            token: token.into(),
        })
    }

    /// The organization this client is scoped to.
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// The API base URL this client talks to.
    pub fn api_base(&self) -> &str {
        &self.base_url
    }

    /// Issue a form-encoded `POST` and discard the (usually empty) body.
    pub(crate) async fn post_form(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<(), ProviderError> {
        debug!(path, "POST");
        let response = self
            .http
            .post(format!("{}/{}", self.base_url, path))
            .basic_auth(&self.token, None::<&str>)
            .form(params)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Issue a form-encoded `POST` and decode the JSON response body.
    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        debug!(path, "POST");
        let response = self
            .http
            .post(format!("{}/{}", self.base_url, path))
            .basic_auth(&self.token, None::<&str>)
            .form(params)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Issue a `GET` with query parameters and decode the JSON response body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        debug!(path, "GET");
        let response = self
            .http
            .get(format!("{}/{}", self.base_url, path))
            .basic_auth(&self.token, None::<&str>)
            .query(params)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Map a non-2xx response into an API error carrying the `errors[].msg`
    /// payload SonarCloud returns.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) if !body.errors.is_empty() => body
                .errors
                .into_iter()
                .map(|e| e.msg)
                .collect::<Vec<_>>()
                .join("; "),
            _ => status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string(),
        };

        Err(ProviderError::api(status.as_u16(), message))
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("organization", &self.organization)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = Client::new("my-org", "token123");
        assert!(client.is_ok());
        let client = client.unwrap();
        assert_eq!(client.organization(), "my-org");
        assert_eq!(client.api_base(), "https://sonarcloud.io/api");
    }

    #[test]
    fn test_debug_does_not_expose_token() {
        let client = Client::new("my-org", "super_secret_token_12345").unwrap();
        let debug_output = format!("{:?}", client);

        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_token_12345"));
    }

    #[test]
    fn test_paging_has_more() {
        let first = Paging {
            page_index: 1,
            page_size: 100,
            total: 250,
        };
        assert!(first.has_more());

        let last = Paging {
            page_index: 3,
            page_size: 100,
            total: 250,
        };
        assert!(!last.has_more());
    }
}
